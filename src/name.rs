//! Icon naming: filename normalization, module-id query parsing, prefix
//! inference, and the caller override hook.

use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};

/// Everything a custom name parser gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct NameInput<'a> {
    /// Filename without the `.svg` extension.
    pub filename: &'a str,
    /// Query string from the module id (without the `?`).
    pub query: &'a str,
    /// Module id up to the query.
    pub file_path: &'a str,
    /// The full module id.
    pub module_id: &'a str,
}

/// What a custom name parser returns; `None` fields fall back to the
/// caller's defaults.
#[derive(Debug, Clone, Default)]
pub struct ParsedName {
    pub prefix: Option<String>,
    pub icon_name: String,
    pub aliases: Vec<String>,
}

/// Caller override for the whole naming step.
pub type NameParser = dyn Fn(&NameInput<'_>) -> ParsedName + Send + Sync;

/// A fully resolved icon name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedName {
    pub prefix: String,
    pub icon_name: String,
    pub aliases: Vec<String>,
}

/// Split a string into lowercased alphanumeric words.
///
/// Word boundaries are hyphens, underscores, periods, whitespace, and
/// lower-to-upper camel case transitions; everything non-alphanumeric is
/// dropped from the words themselves.
pub fn normalize_words(input: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut previous_upper = false;

    for c in input.chars() {
        if matches!(c, '-' | '_' | '.') || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_upper = false;
            continue;
        }
        if c.is_uppercase() && !previous_upper && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_upper = c.is_uppercase();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .into_iter()
        .map(|word| {
            word.to_lowercase()
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Resolve prefix, icon name and aliases for a module id.
///
/// The module id is split at the first `?` into file path and query. By
/// default the name derives from the normalized filename, with the query
/// parameters `prefix`, `icon-name` and `aliases` (comma-separated) taking
/// precedence; with `infer_prefix` a first filename word starting with the
/// default prefix is promoted to the prefix. A caller-supplied parser
/// replaces all of that, keeping only the default-prefix and empty-alias
/// fallbacks.
pub fn resolve_name(
    module_id: &str,
    default_prefix: &str,
    infer_prefix: bool,
    parser: Option<&NameParser>,
) -> Result<(String, ResolvedName)> {
    let (file_path, query) = match module_id.split_once('?') {
        Some((path, query)) => (path, query),
        None => (module_id, ""),
    };

    let basename = file_path.rsplit('/').next().unwrap_or(file_path);
    let filename = strip_svg_extension(basename);
    if filename.is_empty() {
        return Err(Error::InvalidModuleId(format!(
            "module has no filename beyond its extension: {module_id}"
        )));
    }

    if let Some(parser) = parser {
        let parsed = parser(&NameInput {
            filename,
            query,
            file_path,
            module_id,
        });
        return Ok((
            file_path.to_string(),
            ResolvedName {
                prefix: parsed.prefix.unwrap_or_else(|| default_prefix.to_string()),
                icon_name: parsed.icon_name,
                aliases: parsed.aliases,
            },
        ));
    }

    let pairs = parse_query(query);
    let words = normalize_words(filename);

    let (prefix, icon_name) =
        if infer_prefix && words.len() > 1 && words[0].starts_with(default_prefix) {
            (words[0].clone(), words[1..].join("-"))
        } else {
            let prefix = query_get(&pairs, "prefix")
                .map(str::to_string)
                .unwrap_or_else(|| default_prefix.to_string());
            let icon_name = query_get(&pairs, "icon-name")
                .map(str::to_string)
                .unwrap_or_else(|| words.join("-"));
            (prefix, icon_name)
        };

    let aliases = query_get(&pairs, "aliases")
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|alias| !alias.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok((
        file_path.to_string(),
        ResolvedName {
            prefix,
            icon_name,
            aliases,
        },
    ))
}

fn strip_svg_extension(basename: &str) -> &str {
    let lower = basename.to_lowercase();
    if lower.ends_with(".svg") {
        &basename[..basename.len() - 4]
    } else {
        basename
    }
}

/// Parse `application/x-www-form-urlencoded` pairs: `&`-separated,
/// percent-decoded, `+` as space.
fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn query_get<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(module_id: &str, infer: bool) -> ResolvedName {
        resolve_name(module_id, "cu", infer, None).unwrap().1
    }

    #[test]
    fn test_normalize_words() {
        assert_eq!(normalize_words("ArrowUp"), vec!["arrow", "up"]);
        assert_eq!(normalize_words("fa_arrow.up"), vec!["fa", "arrow", "up"]);
        assert_eq!(normalize_words("HTTPServer"), vec!["httpserver"]);
        assert_eq!(normalize_words("icon--big bad"), vec!["icon", "big", "bad"]);
        assert_eq!(normalize_words("café+menu"), vec!["cafmenu"]);
    }

    #[test]
    fn test_default_name_from_filename() {
        let name = resolve("assets/ArrowUp.svg", false);
        assert_eq!(name.prefix, "cu");
        assert_eq!(name.icon_name, "arrow-up");
        assert!(name.aliases.is_empty());
    }

    #[test]
    fn test_query_overrides() {
        let name = resolve(
            "icons/x.svg?prefix=fa&icon-name=north&aliases=up,arrow%20up",
            false,
        );
        assert_eq!(name.prefix, "fa");
        assert_eq!(name.icon_name, "north");
        assert_eq!(name.aliases, vec!["up", "arrow up"]);
    }

    #[test]
    fn test_infer_prefix() {
        // Inference matches the first word against the configured prefix.
        let name = resolve_name("icons/fasArrowUp.svg", "fa", true, None).unwrap().1;
        assert_eq!(name.prefix, "fas");
        assert_eq!(name.icon_name, "arrow-up");

        // A single-word filename never donates its only word.
        let name = resolve_name("icons/fa.svg", "fa", true, None).unwrap().1;
        assert_eq!(name.prefix, "fa");
        assert_eq!(name.icon_name, "fa");

        // Unrelated first words leave the prefix alone.
        let name = resolve_name("icons/bigArrow.svg", "fa", true, None).unwrap().1;
        assert_eq!(name.prefix, "fa");
        assert_eq!(name.icon_name, "big-arrow");
    }

    #[test]
    fn test_empty_filename_is_error() {
        assert!(resolve_name("icons/.svg", "cu", false, None).is_err());
    }

    #[test]
    fn test_file_path_split() {
        let (path, _) = resolve_name("a/b.svg?x=1", "cu", false, None).unwrap();
        assert_eq!(path, "a/b.svg");
    }

    #[test]
    fn test_custom_parser_with_fallbacks() {
        let parser: Box<NameParser> = Box::new(|input: &NameInput<'_>| ParsedName {
            prefix: None,
            icon_name: input.filename.to_uppercase(),
            aliases: vec![],
        });
        let (_, name) = resolve_name("icons/up.svg", "cu", false, Some(parser.as_ref())).unwrap();
        assert_eq!(name.prefix, "cu");
        assert_eq!(name.icon_name, "UP");
    }
}
