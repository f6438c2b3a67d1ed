/// Prefix every line of `input` with `indent_level` spaces
///
/// A trailing newline in `input` is preserved.
pub fn indent_lines(input: &str, indent_level: usize) -> String {
    let indent = " ".repeat(indent_level);
    let mut output = String::new();

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n')
        }

        output.push_str(&indent);
        output.push_str(line);
    }

    if input.ends_with('\n') {
        output.push('\n')
    }

    output
}
