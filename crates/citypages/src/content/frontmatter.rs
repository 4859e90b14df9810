use std::sync::LazyLock;

use log::debug;
use regex::Regex;

static BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^---\s*(.*?)\s*---").unwrap());
static TOP_LEVEL_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][\w-]*):(.*)$").unwrap());
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-\s*(.*?)\s*$").unwrap());

/// Returns the body of the first `---` delimited block of a file, if any.
pub fn extract_block(text: &str) -> Option<&str> {
    BLOCK
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|block| block.as_str())
}

/// The front matter fields citypages cares about.
///
/// Everything else in the block is ignored. Scalar fields keep their first occurrence.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub slug: Option<String>,
    pub city_title: Option<String>,
    pub title: Option<String>,
    pub preposition: Option<String>,
    pub city: Option<String>,
    pub categories: Vec<String>,
}

impl FrontMatter {
    /// Parses the front matter of a whole file. A file without a block yields no fields.
    pub fn parse(text: &str) -> Self {
        match extract_block(text) {
            Some(block) => Self::parse_block(block),
            None => Self::default(),
        }
    }

    fn parse_block(block: &str) -> Self {
        let mut front_matter = Self::default();
        let mut seen_categories = false;
        let mut in_categories_list = false;
        let mut flow_list: Option<String> = None;

        for line in block.lines() {
            if let Some(mut flow) = flow_list.take() {
                let ends_flow = line.trim().is_empty() || TOP_LEVEL_KEY.is_match(line);
                if !ends_flow {
                    flow.push('\n');
                    flow.push_str(line);
                    if line.trim_end().ends_with(']') {
                        front_matter.categories = parse_inline_list(&flow);
                    } else {
                        flow_list = Some(flow);
                    }
                    continue;
                }

                front_matter.categories = parse_inline_list(&flow);
            }

            if in_categories_list {
                if line.trim().is_empty() {
                    in_categories_list = false;
                    continue;
                }

                if !TOP_LEVEL_KEY.is_match(line) {
                    if let Some(item) = LIST_ITEM.captures(line) {
                        push_value(&mut front_matter.categories, &item[1]);
                    }
                    continue;
                }

                in_categories_list = false;
            }

            let Some(captures) = TOP_LEVEL_KEY.captures(line) else {
                continue;
            };
            let value = captures[2].trim();

            match &captures[1] {
                "slug" => set_once(&mut front_matter.slug, value),
                "city_title" => set_once(&mut front_matter.city_title, value),
                "title" => set_once(&mut front_matter.title, value),
                "preposition" => set_once(&mut front_matter.preposition, value),
                "city" => set_once(&mut front_matter.city, value),
                "categories" if !seen_categories => {
                    seen_categories = true;
                    if value.is_empty() {
                        in_categories_list = true;
                    } else if value.starts_with('[') && !value.ends_with(']') {
                        // Flow list continued on the following lines.
                        flow_list = Some(value.to_string());
                    } else {
                        front_matter.categories = parse_inline_list(value);
                    }
                }
                _ => {}
            }
        }

        if let Some(flow) = flow_list {
            front_matter.categories = parse_inline_list(&flow);
        }

        front_matter
    }
}

fn set_once(slot: &mut Option<String>, value: &str) {
    if slot.is_some() {
        return;
    }

    let value = unquote(value);
    if !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

fn push_value(values: &mut Vec<String>, value: &str) {
    let value = unquote(value.trim());
    if !value.is_empty() {
        values.push(value.to_string());
    }
}

/// `[a, "b"]` or a bare scalar, which counts as a single entry.
///
/// Bracketed lists are read as YAML flow sequences, splitting on commas only when they don't parse as one.
fn parse_inline_list(value: &str) -> Vec<String> {
    let mut values = vec![];

    match value.strip_prefix('[') {
        Some(inner) => match serde_yaml::from_str::<Vec<String>>(value) {
            Ok(items) => {
                for item in &items {
                    push_value(&mut values, item);
                }
            }
            Err(err) => {
                debug!(target: "content", "Splitting `{}` on commas: {}", value, err);
                let inner = inner.trim_end().strip_suffix(']').unwrap_or(inner);
                for item in inner.split(',') {
                    push_value(&mut values, item);
                }
            }
        },
        None => push_value(&mut values, value),
    }

    values
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }

    value
}
