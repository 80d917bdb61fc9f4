//! Recovers the source line number of each top-level entry under `steps:`
//! by re-scanning the raw text, since `serde_yaml::Value` carries no
//! location information of its own (§4.3: "Line numbers of each step
//! are tracked alongside the parsed steps").

/// Returns the 1-indexed line number of each `- ` list item directly under
/// the first `steps:` block in `source`, in document order.
pub fn step_line_numbers(source: &str) -> Vec<usize> {
    let lines: Vec<&str> = source.lines().collect();

    let steps_header = lines.iter().position(|line| {
        let trimmed = line.trim_start();
        trimmed == "steps:" || trimmed.starts_with("steps:")
    });

    let Some(header_index) = steps_header else {
        return Vec::new();
    };

    let mut item_indent = None;
    let mut result = Vec::new();

    for (offset, line) in lines.iter().enumerate().skip(header_index + 1) {
        if line.trim().is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        let trimmed = line.trim_start();

        match item_indent {
            None => {
                if !trimmed.starts_with("- ") && trimmed != "-" {
                    // A non-list line before any item means `steps:` had no
                    // block sequence (e.g. `steps: []`); nothing to index.
                    break;
                }
                item_indent = Some(indent);
                result.push(offset + 1);
            }
            Some(expected_indent) => {
                if indent < expected_indent {
                    break;
                }
                if indent == expected_indent && (trimmed.starts_with("- ") || trimmed == "-") {
                    result.push(offset + 1);
                }
            }
        }
    }

    result
}
