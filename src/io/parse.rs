use std::fmt;

use super::error::IoError;

const KEY_ID: &str = "id";
const KEY_NAME: &str = "nome";
const KEY_DOCUMENT: &str = "cpfCnpj";
const KEY_DATE: &str = "data";
const KEY_AMOUNT: &str = "valor";

/// Record as read from one `key:value;key:value` line, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransactionRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub document: Option<String>,
    pub date: Option<String>,
    pub amount: Option<String>,
}

/// Record with every field present and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransaction {
    pub id: String,
    pub name: String,
    pub document: String,
    pub date: String,
    pub amount: String,
}

impl RawTransactionRecord {
    /// Parse one line of text
    ///
    /// Pairs split on `;`, each pair splits at its first `:` only, so keys
    /// cannot contain `:`. Unknown keys are ignored, a repeated key keeps its
    /// last value, and pairs with an empty key or value contribute nothing.
    pub fn parse_line(line: &str) -> Self {
        Self::from_pairs(line.split(';'))
    }

    /// Parse already-split `key:value` pairs
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut record = Self::default();

        for pair in pairs {
            let Some((key, value)) = pair.split_once(':') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }

            let slot = match key {
                KEY_ID => &mut record.id,
                KEY_NAME => &mut record.name,
                KEY_DOCUMENT => &mut record.document,
                KEY_DATE => &mut record.date,
                KEY_AMOUNT => &mut record.amount,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }

        record
    }

    /// Wire keys of the fields that are missing
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            (KEY_ID, &self.id),
            (KEY_NAME, &self.name),
            (KEY_DOCUMENT, &self.document),
            (KEY_DATE, &self.date),
            (KEY_AMOUNT, &self.amount),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(key, _)| key)
        .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Require all five fields
    pub fn validate(self) -> Result<ValidatedTransaction, IoError> {
        match self {
            Self {
                id: Some(id),
                name: Some(name),
                document: Some(document),
                date: Some(date),
                amount: Some(amount),
            } if !id.is_empty()
                && !name.is_empty()
                && !document.is_empty()
                && !date.is_empty()
                && !amount.is_empty() =>
            {
                Ok(ValidatedTransaction {
                    id,
                    name,
                    document,
                    date,
                    amount,
                })
            }
            record => Err(IoError::MissingFields(record.missing_fields())),
        }
    }
}

/// A rejected input line, kept with its original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based physical line number
    pub line: u64,
    pub text: String,
    pub missing: Vec<&'static str>,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid data in line {}: {}", self.line, self.text)
    }
}
