use html_escape::{encode_double_quoted_attribute_to_string, encode_text_to_string};

use super::PreviewCard;

const HOUR: u64 = 60;
const DAY: u64 = 1440;
const MONTH: u64 = 43_200;
const YEAR: u64 = 518_400;

/// Human-readable age of a repository's latest commit.
///
/// A month is 30 days and a year twelve of those.
pub fn last_updated(minutes: u64) -> String {
    if minutes < HOUR {
        format!("last updated {minutes} minutes ago")
    } else if minutes < DAY {
        format!("last updated {} hour(s) ago", minutes / HOUR)
    } else if minutes < MONTH {
        format!("last updated {} day(s) ago", minutes / DAY)
    } else if minutes < YEAR {
        format!("last updated {} month(s) ago", minutes / MONTH)
    } else {
        format!("last updated {} year(s) ago", minutes / YEAR)
    }
}

impl PreviewCard {
    pub fn write_html(&self, out: &mut String) {
        match self {
            PreviewCard::Video {
                url,
                title,
                channel_id,
                channel_title,
                thumbnail_url,
            } => {
                out.push_str(r#"<div class="link-preview youtube-preview"><img src=""#);
                encode_double_quoted_attribute_to_string(thumbnail_url, out);
                out.push_str(r#"" alt=""#);
                encode_double_quoted_attribute_to_string(title, out);
                out.push_str(r#""><div class="preview-body"><a class="preview-title" href=""#);
                encode_double_quoted_attribute_to_string(url, out);
                out.push_str(r#"">"#);
                encode_text_to_string(title, out);
                out.push_str(r#"</a><a class="preview-channel" href="https://www.youtube.com/channel/"#);
                encode_double_quoted_attribute_to_string(channel_id, out);
                out.push_str(r#"">"#);
                encode_text_to_string(channel_title, out);
                out.push_str("</a></div></div>");
            }
            PreviewCard::Repository {
                owner,
                repo,
                branches,
                last_commit_message,
                updated_minutes_ago,
            } => {
                out.push_str(r#"<div class="link-preview github-preview"><p class="preview-title">"#);
                encode_text_to_string(owner, out);
                out.push('/');
                encode_text_to_string(repo, out);
                out.push_str(r#"</p><p class="preview-commit">"#);
                encode_text_to_string(last_commit_message, out);
                out.push_str("</p>");
                if !branches.is_empty() {
                    out.push_str(r#"<ul class="preview-branches">"#);
                    for branch in branches {
                        out.push_str("<li>");
                        encode_text_to_string(branch, out);
                        out.push_str("</li>");
                    }
                    out.push_str("</ul>");
                }
                out.push_str(r#"<p class="preview-updated">"#);
                out.push_str(&last_updated(*updated_minutes_ago));
                out.push_str("</p></div>");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, "last updated 0 minutes ago")]
    #[case(59, "last updated 59 minutes ago")]
    #[case(60, "last updated 1 hour(s) ago")]
    #[case(1439, "last updated 23 hour(s) ago")]
    #[case(1440, "last updated 1 day(s) ago")]
    #[case(43_199, "last updated 29 day(s) ago")]
    #[case(43_200, "last updated 1 month(s) ago")]
    #[case(518_400, "last updated 1 year(s) ago")]
    #[case(1_100_000, "last updated 2 year(s) ago")]
    fn humanizes_commit_age(#[case] minutes: u64, #[case] expected: &str) {
        assert_eq!(last_updated(minutes), expected);
    }

    #[test]
    fn repository_card_escapes_fields() {
        let card = PreviewCard::Repository {
            owner: "me".to_string(),
            repo: "blog".to_string(),
            branches: vec!["main".to_string()],
            last_commit_message: "fix <br> handling".to_string(),
            updated_minutes_ago: 120,
        };
        let mut html = String::new();
        card.write_html(&mut html);
        assert_eq!(
            html,
            concat!(
                r#"<div class="link-preview github-preview"><p class="preview-title">me/blog</p>"#,
                r#"<p class="preview-commit">fix &lt;br&gt; handling</p>"#,
                r#"<ul class="preview-branches"><li>main</li></ul>"#,
                r#"<p class="preview-updated">last updated 2 hour(s) ago</p></div>"#,
            )
        );
    }
}
