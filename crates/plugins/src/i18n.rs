// SPDX-License-Identifier: MIT

//! `i18n` façade (§4.8): `t(key, args)` with `%s` placeholders, and
//! `getTranslatedObject` resolving a multilang value to one string via
//! locale, base-language fallback, then any non-empty value.

use std::collections::HashMap;

/// A multilang value: a map from locale code (e.g. `"en"`, `"de"`) to the
/// string in that locale.
pub type Multilang = HashMap<String, String>;

pub struct I18n {
    /// `key -> locale -> template` translation table.
    translations: HashMap<String, HashMap<String, String>>,
    locale: String,
    base_language: String,
}

impl I18n {
    pub fn new(translations: HashMap<String, HashMap<String, String>>, locale: impl Into<String>, base_language: impl Into<String>) -> Self {
        Self { translations, locale: locale.into(), base_language: base_language.into() }
    }

    /// Resolve `key` in the current locale (falling back to the base
    /// language, then any entry) and substitute `args` into `%s`
    /// placeholders in order. Unknown keys echo back the key itself.
    pub fn t(&self, key: &str, args: &[&str]) -> String {
        let template = self
            .translations
            .get(key)
            .and_then(|by_locale| {
                by_locale
                    .get(&self.locale)
                    .or_else(|| by_locale.get(&self.base_language))
                    .or_else(|| by_locale.values().next())
            })
            .cloned()
            .unwrap_or_else(|| key.to_string());
        substitute(&template, args)
    }

    /// Resolve a multilang value to one display string (§4.8
    /// `getTranslatedObject`): current locale, then base language, then any
    /// non-empty value, then an empty string.
    pub fn get_translated_object(&self, value: &Multilang) -> String {
        value
            .get(&self.locale)
            .filter(|s| !s.is_empty())
            .or_else(|| value.get(&self.base_language).filter(|s| !s.is_empty()))
            .or_else(|| value.values().find(|s| !s.is_empty()))
            .cloned()
            .unwrap_or_default()
    }
}

fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' && chars.peek() == Some(&'s') {
            chars.next();
            if let Some(arg) = args.next() {
                out.push_str(arg);
            } else {
                out.push_str("%s");
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[path = "i18n_tests.rs"]
mod tests;
