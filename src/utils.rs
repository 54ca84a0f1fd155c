//! # Utility Functions Module
//!
//! Helpers for building external tool command lines.

/// Converts any iterable of string-like items into owned command arguments.
///
/// # Example
/// ```rust
/// use imagemin::utils::to_string_vec;
///
/// let level = 3;
/// let args = to_string_vec(["-strip", "all", &format!("-o{}", level)]);
/// assert_eq!(args, vec!["-strip", "all", "-o3"]);
/// ```
pub fn to_string_vec<T, I>(items: I) -> Vec<String>
where
    T: ToString,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(|item| item.to_string()).collect()
}

/// Builds a `Vec<String>` of tool arguments from mixed displayable items.
///
/// # Example
/// ```rust
/// use imagemin::args;
///
/// let args = args!["-outfile", "out.jpg", "in.jpg"];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    [$($item:expr),* $(,)?] => {
        $crate::utils::to_string_vec([$($item.to_string()),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string_vec_tool_flags() {
        let result = to_string_vec(["-copy", "none", "-optimize"]);
        assert_eq!(result, vec!["-copy", "none", "-optimize"]);
    }

    #[test]
    fn test_to_string_vec_empty() {
        let result: Vec<String> = to_string_vec(Vec::<&str>::new());
        assert!(result.is_empty());
    }

    #[test]
    fn test_args_macro_mixed_types() {
        let level = 5;
        let result = args!["-o", level, "--quiet"];
        assert_eq!(result, vec!["-o", "5", "--quiet"]);
    }
}
