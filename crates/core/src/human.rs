/// Integer with thousands separators, `1234567` -> `1,234,567`.
///
/// Non-integral and non-finite values format to an empty string, as the
/// integer format they mirror does.
pub fn human_value(v: f64) -> String {
    if !v.is_finite() || v.fract() != 0.0 {
        return String::new();
    }
    let digits = format!("{:.0}", v.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::human_value;

    #[test]
    fn groups_thousands() {
        assert_eq!(human_value(0.0), "0");
        assert_eq!(human_value(999.0), "999");
        assert_eq!(human_value(1000.0), "1,000");
        assert_eq!(human_value(1234567.0), "1,234,567");
        assert_eq!(human_value(-98765.0), "-98,765");
    }

    #[test]
    fn fractions_are_blank() {
        assert_eq!(human_value(1.5), "");
        assert_eq!(human_value(f64::NAN), "");
    }
}
