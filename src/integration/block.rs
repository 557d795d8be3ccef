use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^<h([1-6])").expect("valid heading pattern");
}

const BACKLINKS: &str = "<strong>Backlinks</strong>";

/// A note reference, optionally pointing into one of its blocks.
///
/// `note` names the whole note and `note#anchor` the block whose line
/// contains `id="anchor`. In the range form `note#start:#end` the last char
/// of `start` is dropped and the rest is searched as plain text, and
/// collection runs until the heading after the line containing `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReference<'a> {
    pub note: &'a str,
    /// Text identifying the first line of the block.
    pub marker: Option<String>,
    pub until: Option<&'a str>,
}

impl<'a> BlockReference<'a> {
    pub fn parse(reference: &'a str) -> Self {
        let parts: Vec<&str> = reference.split('#').collect();

        match parts[..] {
            [note, start, until] => Self {
                note,
                marker: Some(without_last_char(start).to_string()),
                until: Some(until),
            },
            [note, anchor, ..] => Self {
                note,
                marker: Some(format!("id=\"{}", anchor)),
                until: None,
            },
            _ => Self {
                note: reference,
                marker: None,
                until: None,
            },
        }
    }
}

fn without_last_char(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next_back();
    chars.as_str()
}

fn heading_depth(line: &str) -> Option<u32> {
    HEADING
        .captures(line)
        .and_then(|captures| captures[1].parse().ok())
}

/// Cuts the block starting at the first line containing `marker` out of
/// rendered note HTML. Lines are joined without separators.
///
/// Collection stops before the next heading that is not deeper than the
/// block's own, once `until` (if any) has been seen, and always before the
/// backlinks footer.
pub fn extract_block(html: &str, marker: &str, until: Option<&str>) -> String {
    let lines: Vec<&str> = html.lines().collect();

    let mut block = String::new();
    let mut collecting = false;
    let mut depth = u32::MAX;
    let mut reached_end = until.is_none();

    for (i, line) in lines.iter().enumerate() {
        if collecting || line.contains(marker) {
            collecting = true;
            block.push_str(line);
            if let Some(line_depth) = heading_depth(line) {
                depth = depth.min(line_depth);
            }
            if until.is_some_and(|end| line.contains(end)) {
                reached_end = true;
            }
        }

        let Some(next) = lines.get(i + 1) else {
            break;
        };
        if *next == BACKLINKS {
            break;
        }
        let closes_block = heading_depth(next).is_some_and(|next_depth| next_depth <= depth);
        if collecting && reached_end && closes_block {
            break;
        }
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "<h1 id=\"title\">Title</h1>\n\
                        <p>intro</p>\n\
                        <h2 id=\"setup\">Setup</h2>\n\
                        <p>first</p>\n\
                        <h3 id=\"detail\">Detail</h3>\n\
                        <p>second</p>\n\
                        <h2 id=\"outro\">Outro</h2>\n\
                        <p>last</p>\n\
                        <strong>Backlinks</strong>\n\
                        <ul><li>other</li></ul>";

    #[test]
    fn test_parse_reference() {
        assert_eq!(
            BlockReference::parse("places.messina"),
            BlockReference {
                note: "places.messina",
                marker: None,
                until: None
            }
        );
        assert_eq!(
            BlockReference::parse("places.messina#harbour"),
            BlockReference {
                note: "places.messina",
                marker: Some("id=\"harbour".into()),
                until: None
            }
        );
        assert_eq!(
            BlockReference::parse("places.messina#harbour:#gate"),
            BlockReference {
                note: "places.messina",
                marker: Some("harbour".into()),
                until: Some("gate")
            }
        );
    }

    #[test]
    fn test_range_start_always_loses_last_char() {
        let reference = BlockReference::parse("places.messina#harbour#gate");
        assert_eq!(reference.marker.as_deref(), Some("harbou"));
        assert_eq!(reference.until, Some("gate"));

        let reference = BlockReference::parse("places.messina##gate");
        assert_eq!(reference.marker.as_deref(), Some(""));
    }

    #[test]
    fn test_extra_sections_read_as_single_anchor() {
        let reference = BlockReference::parse("a#b#c#d");
        assert_eq!(reference.marker.as_deref(), Some("id=\"b"));
        assert_eq!(reference.until, None);
    }

    #[test]
    fn test_range_marker_matches_plain_text() {
        // No `id="` prefix: the first line mentioning the text starts the block.
        assert_eq!(
            extract_block(NOTE, "first", Some("second")),
            "<p>first</p><h3 id=\"detail\">Detail</h3><p>second</p>"
        );
    }

    #[test]
    fn test_block_stops_at_same_depth_heading() {
        assert_eq!(
            extract_block(NOTE, "id=\"setup", None),
            "<h2 id=\"setup\">Setup</h2><p>first</p><h3 id=\"detail\">Detail</h3><p>second</p>"
        );
    }

    #[test]
    fn test_block_stops_before_backlinks() {
        assert_eq!(
            extract_block(NOTE, "id=\"outro", None),
            "<h2 id=\"outro\">Outro</h2><p>last</p>"
        );
    }

    #[test]
    fn test_range_runs_past_headings_until_end_seen() {
        assert_eq!(
            extract_block(NOTE, "setup", Some("outro")),
            "<h2 id=\"setup\">Setup</h2><p>first</p><h3 id=\"detail\">Detail</h3>\
             <p>second</p><h2 id=\"outro\">Outro</h2><p>last</p>"
        );
    }

    #[test]
    fn test_missing_anchor_is_empty() {
        assert_eq!(extract_block(NOTE, "id=\"nowhere", None), "");
    }

    #[test]
    fn test_crlf_lines() {
        let html = "<h2 id=\"a\">A</h2>\r\n<p>x</p>\r\n<h2 id=\"b\">B</h2>";
        assert_eq!(extract_block(html, "id=\"a", None), "<h2 id=\"a\">A</h2><p>x</p>");
    }
}
