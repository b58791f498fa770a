//! Inline HTML pages: the prediction form, the result and the error page

use std::fmt::Write as _;

use crate::catalog::{FormField, FormInput};

const STYLE: &str = r#"
    <style>
        body {
            font-family: Arial, sans-serif;
            max-width: 800px;
            margin: 50px auto;
            padding: 20px;
            background: #f5f5f5;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        h1 {
            color: #333;
            border-bottom: 3px solid #4CAF50;
            padding-bottom: 10px;
        }
        label {
            display: block;
            margin-top: 12px;
            font-weight: bold;
        }
        input, select {
            width: 100%;
            padding: 8px;
            margin-top: 4px;
            box-sizing: border-box;
        }
        button {
            margin-top: 20px;
            padding: 10px 20px;
            background: #4CAF50;
            color: white;
            border: none;
            border-radius: 4px;
        }
        .price {
            font-size: 2em;
            color: #4CAF50;
        }
        .error {
            color: #c62828;
        }
        table {
            width: 100%;
            border-collapse: collapse;
        }
        td {
            padding: 6px;
            border-bottom: 1px solid #eee;
        }
    </style>"#;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>{STYLE}
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// The prediction form
pub fn index_page(fields: &[FormField]) -> String {
    let mut body = String::from(
        "        <h1>Pakistan House Price Prediction</h1>\n        <form method=\"post\" action=\"/predict\">\n",
    );

    for field in fields {
        let name = escape(&field.name);
        let _ = writeln!(
            body,
            "            <label for=\"{name}\">{}</label>",
            escape(&field.label)
        );
        match &field.input {
            FormInput::Select { options } => {
                let _ = writeln!(body, "            <select id=\"{name}\" name=\"{name}\" required>");
                for option in options {
                    let option = escape(option);
                    let _ = writeln!(body, "                <option value=\"{option}\">{option}</option>");
                }
                body.push_str("            </select>\n");
            }
            FormInput::Number { min, max, default } => {
                let _ = writeln!(
                    body,
                    "            <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" value=\"{default}\" step=\"any\" required>"
                );
            }
        }
    }

    body.push_str("            <button type=\"submit\">Predict Price</button>\n        </form>");
    page("House Price Prediction", &body)
}

/// Prediction result with a summary of what was submitted
pub fn result_page(formatted: &str, value: f64, inputs: &[(String, String)]) -> String {
    let mut body = String::from("        <h1>Estimated Price</h1>\n");
    let _ = writeln!(body, "        <p class=\"price\">{}</p>", escape(formatted));
    let _ = writeln!(body, "        <p>Predicted value: {value:.2}</p>");

    body.push_str("        <table>\n");
    for (label, value) in inputs {
        let _ = writeln!(
            body,
            "            <tr><td>{}</td><td>{}</td></tr>",
            escape(label),
            escape(value)
        );
    }
    body.push_str("        </table>\n        <p><a href=\"/\">Make another prediction</a></p>");
    page("Prediction Result", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "        <h1>Error</h1>\n        <p class=\"error\">{}</p>\n        <p><a href=\"/\">Back to the form</a></p>",
        escape(message)
    );
    page("Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("Area Size"), "Area Size");
    }

    #[test]
    fn test_index_renders_inputs() {
        let fields = vec![
            FormField {
                name: "city".to_string(),
                label: "City".to_string(),
                input: FormInput::Select {
                    options: vec!["Islamabad".to_string(), "Lahore".to_string()],
                },
            },
            FormField {
                name: "Area Size".to_string(),
                label: "Area Size".to_string(),
                input: FormInput::Number {
                    min: 0.5,
                    max: 100.0,
                    default: 5.0,
                },
            },
        ];
        let html = index_page(&fields);

        assert!(html.contains(r#"<select id="city" name="city" required>"#));
        assert!(html.contains(r#"<option value="Lahore">Lahore</option>"#));
        assert!(html.contains(r#"name="Area Size" min="0.5" max="100" value="5""#));
        assert!(html.contains(r#"action="/predict""#));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error_page("Invalid value '<script>' for city");
        assert!(html.contains("Invalid value &#39;&lt;script&gt;&#39; for city"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_result_page() {
        let html = result_page(
            "PKR 12,345,000",
            12_345_000.0,
            &[("City".to_string(), "Islamabad".to_string())],
        );
        assert!(html.contains("PKR 12,345,000"));
        assert!(html.contains("Predicted value: 12345000.00"));
        assert!(html.contains("<td>City</td><td>Islamabad</td>"));
    }
}
