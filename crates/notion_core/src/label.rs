use url::Url;

/// Label used when neither a caption nor the file name yields anything.
pub const FALLBACK_LABEL: &str = "Story";

/// Minimum length of a trailing digit run treated as an upload id.
const NUMERIC_SUFFIX_MIN: usize = 5;

/// Display label for a highlight image: the caption when it has content,
/// otherwise a cleaned-up file name, otherwise [`FALLBACK_LABEL`].
pub fn derive_label(caption: &str, url: &str) -> String {
    if !caption.trim().is_empty() {
        return caption.to_string();
    }
    label_from_url(url).unwrap_or_else(|| FALLBACK_LABEL.to_string())
}

/// `https://host/a/My-Photo-123456789.jpg` -> `My Photo`.
///
/// Returns `None` when the url does not parse, its last path segment is
/// empty, the name does not decode, or nothing is left after cleaning.
pub fn label_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    // A trailing slash leaves an empty last segment, which yields no label.
    let segment = parsed.path_segments()?.last()?;
    let decoded = urlencoding::decode(segment).ok()?;
    let stem = strip_extension(&decoded);
    let spaced = separators_to_spaces(stem);
    let label = strip_numeric_suffix(spaced.trim_end()).trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

// Collapse runs of '-' and '_' into a single space.
fn separators_to_spaces(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_separator = false;
    for c in input.chars() {
        if c == '-' || c == '_' {
            if !prev_separator {
                out.push(' ');
            }
            prev_separator = true;
        } else {
            out.push(c);
            prev_separator = false;
        }
    }
    out
}

fn strip_numeric_suffix(input: &str) -> &str {
    let digits = input
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits >= NUMERIC_SUFFIX_MIN {
        &input[..input.len() - digits]
    } else {
        input
    }
}
