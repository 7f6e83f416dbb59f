//! Java literal and identifier rendering.

/// A double-quoted Java string literal.
pub fn string(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// A Java string literal, or `null`.
pub fn optional_string(s: Option<&str>) -> String {
    s.map(string).unwrap_or_else(|| "null".to_string())
}

/// Integral values print without a fractional part.
pub fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Text safe to place after `//` on a single line.
pub fn comment(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

/// UpperCamelCase class name from a workflow name, suffixed with `Workflow`.
pub fn class_name(name: &str) -> String {
    let mut out: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect();

    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "Generated");
    }
    if !out.ends_with("Workflow") {
        out.push_str("Workflow");
    }
    out
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_newlines() {
        assert_eq!(string("say \"hi\"\n"), r#""say \"hi\"\n""#);
        assert_eq!(string(r"C:\tmp"), r#""C:\\tmp""#);
    }

    #[test]
    fn numbers() {
        assert_eq!(number(5000.0), "5000");
        assert_eq!(number(2.5), "2.5");
    }

    #[test]
    fn class_names() {
        assert_eq!(class_name("ETL"), "EtlWorkflow");
        assert_eq!(class_name("daily report-sync"), "DailyReportSyncWorkflow");
        assert_eq!(class_name("WORKFLOW"), "Workflow");
        assert_eq!(class_name("3 steps"), "Generated3StepsWorkflow");
        assert_eq!(class_name(""), "GeneratedWorkflow");
    }

    #[test]
    fn comments_stay_on_one_line() {
        assert_eq!(comment("a\nb\r\nc"), "a b  c");
    }
}
