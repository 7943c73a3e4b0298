use crate::error::{ReadModeError, Result};
use crate::siteconfig::directives::{SiteConfig, parse_directive};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Site config file parser
///
/// Files are line oriented `key: value` pairs. Blank lines and lines
/// starting with `#` are ignored; `main` and `remove` may repeat.
///
/// ```text
/// # blog.example.com
/// type: article
/// main: .entry-body, article
/// remove: .author-card
/// preserve_comments: no
/// ```
#[derive(Debug)]
pub struct ConfigParser;

impl ConfigParser {
    /// Parse a single site config file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
        let file = std::fs::File::open(&path).map_err(|e| {
            ReadModeError::SiteConfigError(format!("Cannot open file {}: {}", path.as_ref().display(), e))
        })?;

        let reader = BufReader::new(file);
        Self::parse_reader(reader)
    }

    /// Parse a site config from a reader
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<SiteConfig> {
        let mut config = SiteConfig::new();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line
                .map_err(|e| ReadModeError::SiteConfigError(format!("Read error at line {}: {}", line_number, e)))?;
            Self::apply_line(&mut config, &line, line_number)?;
        }

        Ok(config)
    }

    /// Parse a site config from a string
    pub fn parse_string(content: &str) -> Result<SiteConfig> {
        let mut config = SiteConfig::new();

        for (index, line) in content.lines().enumerate() {
            Self::apply_line(&mut config, line, index + 1)?;
        }

        Ok(config)
    }

    fn apply_line(config: &mut SiteConfig, line: &str, line_number: usize) -> Result<()> {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let directive = parse_directive(line)
            .map_err(|e| ReadModeError::SiteConfigError(format!("Parse error at line {}: {}", line_number, e)))?;
        config.add_directive(directive);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ExtractorKind;
    use crate::siteconfig::directives::ContentType;
    use std::io::Cursor;

    #[test]
    fn test_parse_string_basic() {
        let content = r#"
# Example config
type: discussion
main: .thread-body
comments: .reply
comments_container: .replies
preserve_comments: yes
"#;

        let config = ConfigParser::parse_string(content).unwrap();

        assert_eq!(config.content_type, ContentType::Discussion);
        assert_eq!(config.main_selectors, vec![".thread-body".to_string()]);
        assert_eq!(config.comment_selectors.as_deref(), Some(".reply"));
        assert_eq!(config.comments_container.as_deref(), Some(".replies"));
        assert!(config.preserve_comments);
    }

    #[test]
    fn test_parse_string_multiple_directives() {
        let content = r#"
main: article.post
main: [data-testid="post-content"], .Post
remove: .kr-aside
remove: img[src*="spacer"]
extractor: reddit
"#;

        let config = ConfigParser::parse_string(content).unwrap();

        assert_eq!(config.main_selectors.len(), 2);
        assert_eq!(config.main_selectors[1], r#"[data-testid="post-content"], .Post"#);
        assert_eq!(config.remove_selectors.len(), 2);
        assert_eq!(config.extractor, Some(ExtractorKind::Reddit));
    }

    #[test]
    fn test_parse_reader() {
        let content = r#"
main: article
remove: .promo
"#;

        let cursor = Cursor::new(content);
        let config = ConfigParser::parse_reader(cursor).unwrap();

        assert_eq!(config.main_selectors.len(), 1);
        assert_eq!(config.remove_selectors.len(), 1);
    }

    #[test]
    fn test_parse_invalid_directive_reports_line() {
        let content = "main: article\n\ninvalid_directive_without_colon";

        let err = ConfigParser::parse_string(content).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_parse_empty_and_comments() {
        let content = r#"
# This is a comment
# Another comment

main: article

# Final comment
"#;

        let config = ConfigParser::parse_string(content).unwrap();

        assert_eq!(config.main_selectors, vec!["article".to_string()]);
        assert_eq!(config.content_type, ContentType::Article);
        assert!(!config.preserve_comments);
    }
}
