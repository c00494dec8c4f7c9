// LogSieve - core/sanitize.rs
//
// Filter name -> filesystem-safe file stem, plus the injectivity check that
// keeps two filters from writing to the same output file.

use crate::util::error::FilterError;
use std::collections::HashMap;

/// Map a filter display name to a file stem safe on every platform.
///
/// Space becomes `_`, `&` becomes `_and_`, `|` becomes `_or_`, and
/// `: / \ ? < > *` are dropped. Spaces directly around `&` and `|` are
/// absorbed by the operator word, so `cpu & mem` becomes `cpu_and_mem`.
pub fn file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_spaces = 0usize;
    let mut after_operator = false;

    for c in name.chars() {
        match c {
            ' ' => {
                if !after_operator {
                    pending_spaces += 1;
                }
            }
            '&' | '|' => {
                pending_spaces = 0;
                after_operator = true;
                out.push_str(if c == '&' { "_and_" } else { "_or_" });
            }
            ':' | '/' | '\\' | '?' | '<' | '>' | '*' => {}
            other => {
                out.extend(std::iter::repeat('_').take(pending_spaces));
                pending_spaces = 0;
                after_operator = false;
                out.push(other);
            }
        }
    }
    out.extend(std::iter::repeat('_').take(pending_spaces));
    out
}

/// Verify that no two distinct names share a file stem.
///
/// Stems are compared without regard to case, since `Errors.txt` and
/// `errors.txt` are the same file on Windows and default macOS volumes.
/// `reserved` stems (such as the pass-through file) are treated as already
/// taken by the given owner name.
pub fn check_injective<'a, I>(names: I, reserved: &[(&str, &str)]) -> Result<(), FilterError>
where
    I: IntoIterator<Item = &'a str>,
{
    // Value: owning name, and whether the stem is reserved.
    let mut seen: HashMap<String, (&str, bool)> = reserved
        .iter()
        .map(|(owner, stem)| (stem.to_lowercase(), (*owner, true)))
        .collect();

    for name in names {
        let stem = file_stem(name);
        let key = stem.to_lowercase();
        match seen.get(&key) {
            Some(&(first, is_reserved)) if is_reserved || first != name => {
                return Err(FilterError::FileNameCollision {
                    first: first.to_string(),
                    second: name.to_string(),
                    file_stem: stem,
                });
            }
            Some(_) => {}
            None => {
                seen.insert(key, (name, false));
            }
        }
    }
    Ok(())
}
