//! Literal placeholder substitution for winner emails.
//!
//! Not a template language: no escaping, no conditionals, unknown
//! `{{...}}` placeholders are left as they are.

pub const DEFAULT_WINNER_EMAIL_TEMPLATE: &str = "Congratulations {{full_name}}!\n\n\
You have won {{prize_name}} with lucky number {{lucky_number}}.\n\
We will contact you at {{phone}} to arrange the prize.";

/// Values substituted into a winner email.
#[derive(Debug, Clone)]
pub struct WinnerEmailFields<'a> {
    pub full_name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub prize_name: &'a str,
    pub lucky_number: &'a str,
}

pub fn render_winner_email(template: &str, fields: &WinnerEmailFields<'_>) -> String {
    [
        ("{{full_name}}", fields.full_name),
        ("{{phone}}", fields.phone),
        ("{{email}}", fields.email),
        ("{{prize_name}}", fields.prize_name),
        ("{{lucky_number}}", fields.lucky_number),
    ]
    .iter()
    .fold(template.to_string(), |body, (placeholder, value)| {
        body.replace(placeholder, value)
    })
}

pub fn winner_email_subject(prize_name: &str) -> String {
    format!("Congratulations! You won: {prize_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> WinnerEmailFields<'static> {
        WinnerEmailFields {
            full_name: "Lan",
            phone: "0901234567",
            email: "lan@example.com",
            prize_name: "VPS Pro",
            lucky_number: "48213",
        }
    }

    #[test]
    fn test_render_exact_substitution() {
        let body = render_winner_email("Hi {{full_name}}, you won {{prize_name}}!", &fields());
        assert_eq!(body, "Hi Lan, you won VPS Pro!");
    }

    #[test]
    fn test_render_all_placeholders_and_repeats() {
        let body = render_winner_email(
            "{{full_name}}|{{phone}}|{{email}}|{{prize_name}}|{{lucky_number}}|{{full_name}}",
            &fields(),
        );
        assert_eq!(
            body,
            "Lan|0901234567|lan@example.com|VPS Pro|48213|Lan"
        );
    }

    #[test]
    fn test_unknown_placeholders_left_verbatim() {
        let body = render_winner_email("Hi {{nickname}} <b>{{full_name}}</b>", &fields());
        assert_eq!(body, "Hi {{nickname}} <b>Lan</b>");
    }

    #[test]
    fn test_subject_contains_prize_name() {
        assert_eq!(
            winner_email_subject("VPS Pro"),
            "Congratulations! You won: VPS Pro"
        );
    }
}
