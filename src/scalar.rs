//! Lenient decoding of YAML scalars.
//!
//! Data files are hand written, so a VAT number or invoice number may come
//! through as an integer and a quantity as a bare float. Text fields keep the
//! scalar's textual form; decimal fields are parsed from text wherever the
//! document provides it, and floats go through their shortest round-trip
//! representation rather than their binary expansion.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

struct Text(String);

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct TextVisitor;

        impl<'de> Visitor<'de> for TextVisitor {
            type Value = Text;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Text, E> {
                Ok(Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Text, E> {
                Ok(Text(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Text, E> {
                Ok(Text(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Text, E> {
                Ok(Text(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Text, E> {
                Ok(Text(v.to_string()))
            }
        }

        d.deserialize_any(TextVisitor)
    }
}

struct Exact(Decimal);

impl<'de> Deserialize<'de> for Exact {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct ExactVisitor;

        impl<'de> Visitor<'de> for ExactVisitor {
            type Value = Exact;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Exact, E> {
                Decimal::from_str(v.trim())
                    .map(Exact)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Exact, E> {
                Ok(Exact(Decimal::from(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Exact, E> {
                Ok(Exact(Decimal::from(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Exact, E> {
                // Display gives the shortest text that reads back as `v`,
                // which is what the author typed for any sane amount.
                Decimal::from_str(&v.to_string())
                    .map(Exact)
                    .map_err(|_| E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }

        d.deserialize_any(ExactVisitor)
    }
}

pub fn opt_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Text>::deserialize(d)?.map(|t| t.0))
}

pub fn opt_decimal<'de, D>(d: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Exact>::deserialize(d)?.map(|e| e.0))
}

pub fn opt_rates<'de, D>(d: D) -> Result<Option<BTreeMap<String, Decimal>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rates = Option::<BTreeMap<String, Exact>>::deserialize(d)?;
    Ok(rates.map(|r| r.into_iter().map(|(k, v)| (k, v.0)).collect()))
}

pub fn opt_accounts<'de, D>(d: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let accounts = Option::<BTreeMap<String, Text>>::deserialize(d)?;
    Ok(accounts.map(|a| a.into_iter().map(|(k, v)| (k, v.0)).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Deserialize, Debug)]
    struct Sample {
        #[serde(default, deserialize_with = "opt_text")]
        text: Option<String>,
        #[serde(default, deserialize_with = "opt_decimal")]
        amount: Option<Decimal>,
        #[serde(default, deserialize_with = "opt_rates")]
        rates: Option<BTreeMap<String, Decimal>>,
    }

    #[test]
    fn numbers_become_text() {
        let sample: Sample = serde_yaml::from_str("text: 17").unwrap();
        assert_eq!(sample.text.as_deref(), Some("17"));
        assert_eq!(sample.amount, None);
    }

    #[test]
    fn floats_keep_their_written_digits() {
        let sample: Sample =
            serde_yaml::from_str("amount: 4.4567\nrates: {EUR: 4.97, USD: '3.2101'}")
                .unwrap();
        assert_eq!(sample.amount, Some(dec!(4.4567)));
        let rates = sample.rates.unwrap();
        assert_eq!(rates["EUR"], dec!(4.97));
        assert_eq!(rates["EUR"].scale(), 2);
        assert_eq!(rates["USD"], dec!(3.2101));
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        let result: Result<Sample, _> = serde_yaml::from_str("amount: lots");
        assert!(result.is_err());
    }
}
