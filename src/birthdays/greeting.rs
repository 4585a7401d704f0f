/// Greeting sent when no template is configured.
pub const DEFAULT_GREETING: &str =
    "Happy Birthday, {name}! 🎉 Hope you have an amazing day filled with joy and laughter!";

/// Greeting text with a `{name}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingTemplate(String);

impl GreetingTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Escapes in the template are expanded before the name goes in, so a
    /// name is never rewritten.
    pub fn render(&self, name: &str) -> String {
        self.0.replace("\\n", "\n").replace("{name}", name)
    }
}

impl Default for GreetingTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

/// Phone number in the form the dispatcher expects: trimmed, with a leading `+`.
pub fn normalize_phone(phone: &str) -> String {
    let phone = phone.trim();
    if phone.starts_with('+') {
        phone.to_string()
    } else {
        format!("+{}", phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_greeting() {
        assert_eq!(
            GreetingTemplate::default().render("Alice Johnson"),
            "Happy Birthday, Alice Johnson! 🎉 Hope you have an amazing day filled with joy and laughter!"
        );
    }

    #[test]
    fn test_custom_template() {
        let template = GreetingTemplate::new("Hi {name},\\nenjoy it, {name}!");
        assert_eq!(template.render("Bob"), "Hi Bob,\nenjoy it, Bob!");
    }

    #[test]
    fn test_name_is_inserted_verbatim() {
        let template = GreetingTemplate::new("Hi {name}!\\nCheers");
        assert_eq!(template.render(r"C:\new"), "Hi C:\\new!\nCheers");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+1234567890"), "+1234567890");
        assert_eq!(normalize_phone("1234567890"), "+1234567890");
        assert_eq!(normalize_phone(" 44 20 "), "+44 20");
    }
}
