// Run-time text substitution by language code.
// Visual: clicking ES / EN in the navbar swaps every label on the page;
// labels with no translation keep whatever they showed before.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::Error;
use crate::storage::KeyValueStore;

/// Language code -> nested string dictionary.
#[derive(Clone, Debug, Default)]
pub struct Translations {
    langs: BTreeMap<String, Value>,
}

impl Translations {
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        let langs: BTreeMap<String, Value> = serde_json::from_str(text)?;
        Ok(Self { langs })
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Try each candidate resource in order; the first that loads wins.
    /// If none does, fall back to the small built-in dictionary.
    pub fn load(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            match Self::from_file(path) {
                Ok(t) => {
                    info!(path = %path.display(), langs = t.langs.len(), "translations loaded");
                    return t;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "failed to load translations"),
            }
        }
        warn!("using built-in translations fallback; only nav and hero keys are covered");
        Self::builtin()
    }

    /// Minimal dictionary compiled into the binary.
    pub fn builtin() -> Self {
        let langs = BTreeMap::from([
            ("es".to_owned(), json!({
                "nav": {
                    "inicio": "Inicio",
                    "nosotros": "Nosotros",
                    "soluciones": "Soluciones",
                    "clientes": "Clientes",
                    "socios": "Socios Estratégicos",
                    "capacidades": "Capacidades",
                    "contacto": "Contacto"
                },
                "hero": {
                    "title": "Soluciones de Movilidad Táctica de Clase Mundial",
                    "subtitle": "Conectamos a las fuerzas de defensa y seguridad con los mejores fabricantes de vehículos blindados y tácticos del mundo",
                    "cta": "Solicitar Información",
                    "scrollText": "Descubre más"
                }
            })),
            ("en".to_owned(), json!({
                "nav": {
                    "inicio": "Home",
                    "nosotros": "About Us",
                    "soluciones": "Solutions",
                    "clientes": "Clients",
                    "socios": "Strategic Partners",
                    "capacidades": "Capabilities",
                    "contacto": "Contact"
                },
                "hero": {
                    "title": "World-Class Tactical Mobility Solutions",
                    "subtitle": "We connect defense and security forces with the world's leading armored and tactical vehicle manufacturers",
                    "cta": "Request Information",
                    "scrollText": "Discover more"
                }
            })),
        ]);
        Self { langs }
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.langs.contains_key(lang)
    }

    /// Walk `a.b.c` through the dictionary for `lang`. Only string leaves resolve.
    pub fn lookup(&self, lang: &str, path: &str) -> Option<&str> {
        path.split('.')
            .try_fold(self.langs.get(lang)?, |node, key| node.get(key))?
            .as_str()
    }
}

/// A piece of page text that can be retranslated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub text: String,
    pub placeholder: String,
    pub aria_label: String,
    text_key: Option<String>,
    placeholder_key: Option<String>,
    aria_key: Option<String>,
}

impl Element {
    /// Element whose text comes from `key`, showing `fallback` until translated.
    pub fn text(key: &str, fallback: &str) -> Self {
        Self { text: fallback.to_owned(), text_key: Some(key.to_owned()), ..Self::default() }
    }

    pub fn with_placeholder(mut self, key: &str, fallback: &str) -> Self {
        self.placeholder = fallback.to_owned();
        self.placeholder_key = Some(key.to_owned());
        self
    }

    pub fn with_aria(mut self, key: &str, fallback: &str) -> Self {
        self.aria_label = fallback.to_owned();
        self.aria_key = Some(key.to_owned());
        self
    }
}

/// Current language + translations, persisted through a key-value store.
#[derive(Debug)]
pub struct I18n {
    translations: Translations,
    current: String,
    storage_key: String,
}

impl I18n {
    /// Pick the saved language if it is supported, else `default_lang`.
    pub fn restore(
        translations: Translations,
        store: &dyn KeyValueStore,
        storage_key: &str,
        default_lang: &str,
    ) -> Self {
        let current = store
            .get(storage_key)
            .filter(|saved| translations.supports(saved))
            .unwrap_or_else(|| default_lang.to_owned());
        info!(lang = %current, "language restored");
        Self { translations, current, storage_key: storage_key.to_owned() }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_active(&self, lang: &str) -> bool {
        self.current == lang
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.translations.langs.keys().map(String::as_str)
    }

    /// Switch language and persist the choice. Unsupported codes change nothing.
    /// Returns whether the language was applied.
    pub fn set_language(&mut self, lang: &str, store: &mut dyn KeyValueStore) -> bool {
        if !self.translations.supports(lang) {
            warn!(lang, "ignoring unsupported language");
            return false;
        }
        self.current = lang.to_owned();
        if let Err(e) = store.set(&self.storage_key, lang.to_owned()) {
            warn!(error = %e, "could not persist language choice");
        }
        info!(lang, "language changed");
        true
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.translations.lookup(&self.current, key)
    }

    /// Retranslate every bound attribute; unresolved keys leave it as is.
    pub fn apply(&self, elements: &mut [Element]) {
        for el in elements {
            let slots = [
                (&el.text_key, &mut el.text),
                (&el.placeholder_key, &mut el.placeholder),
                (&el.aria_key, &mut el.aria_label),
            ];
            for (key, slot) in slots {
                if let Some(value) = key.as_deref().and_then(|k| self.lookup(k)) {
                    *slot = value.to_owned();
                }
            }
        }
    }
}
