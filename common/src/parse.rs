use api::text::Pair;

// split raw text into `name: value` pairs
//
// lines are trimmed and split on the first colon only, so a value may itself contain
// colons.  lines with no colon, no name, or no value are dropped without comment
pub fn parse_pairs(input: &str) -> Vec<Pair> {
    input.lines().filter_map(parse_line).collect()
}

pub fn parse_line(line: &str) -> Option<Pair> {
    let (name, value) = line.trim().split_once(':')?;
    let (name, value) = (name.trim(), value.trim());

    if name.is_empty() || value.is_empty() {
        return None;
    }

    Some(Pair::new(name, value))
}

pub fn format_pairs<'a>(pairs: impl IntoIterator<Item = &'a Pair>) -> String {
    pairs
        .into_iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_malformed_lines_are_dropped() {
        let pairs = parse_pairs("\n  color-primary :  #fff  \nno colon here\n: orphan\nempty:\n\n");

        assert_eq!(pairs, vec![Pair::new("color-primary", "#fff")]);
    }

    #[test]
    fn only_the_first_colon_splits() {
        let pairs = parse_pairs("font-url: https://example.com/a.woff");

        assert_eq!(pairs[0].name, "font-url");
        assert_eq!(pairs[0].value, "https://example.com/a.woff");
    }

    #[test]
    fn windows_line_endings_are_trimmed() {
        let pairs = parse_pairs("a: 1\r\nb: 2\r\n");

        assert_eq!(format_pairs(&pairs), "a: 1\nb: 2");
    }
}
