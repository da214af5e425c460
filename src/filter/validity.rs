/// Characters and substrings that disqualify a quoted root-relative path.
const BLACKLIST: &[&str] = &[
    "$", "#", "|", "\\", "?", "(", ")", "[", "]", "{", "}", ",", "<", ":", "*", ">", "\n",
    "./", "//",
    // static assets
    ".svg", ".png", ".jpg", ".ico",
];

/// Returns true if a path candidate is plausible output.
///
/// Pure substring membership: no case folding, no trimming. Strings of one
/// character or less are rejected.
pub fn is_valid(candidate: &str) -> bool {
    if candidate.chars().count() <= 1 {
        return false;
    }
    !BLACKLIST.iter().any(|needle| candidate.contains(needle))
}
