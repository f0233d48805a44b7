// First and last name for a customer record. Explicit names win, otherwise
// the card holder name is split on its first whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerName{
    pub first_name: String,
    pub last_name: String
}

impl CustomerName {
    pub fn resolve(
        first_name: Option<&str>,
        last_name: Option<&str>,
        cardholder_name: &str
    ) -> Self {
        let first_name = first_name.map(str::trim).filter(|s| !s.is_empty());
        let last_name = last_name.map(str::trim).filter(|s| !s.is_empty());

        let (split_first, split_last) = match cardholder_name.trim().split_once(char::is_whitespace) {
            Some((first, last)) => (first, last.trim()),
            None => (cardholder_name.trim(), "")
        };

        Self{
            first_name: first_name.unwrap_or(split_first).to_string(),
            last_name: last_name.unwrap_or(split_last).to_string()
        }
    }
}
