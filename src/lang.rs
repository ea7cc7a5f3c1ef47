//! Language Control
//!
//! Tracks the active dashboard language, validates candidate codes against
//! the supported set, and fronts the translation backend behind a narrow
//! trait so the rest of the engine never touches the framework directly.
//!
//! Requests flow through the dashboard event loop one at a time, so a
//! language change is always fully applied (strings switched, dependent
//! components redrawn) before the next request is considered.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Languages supported by the built-in catalog
pub const DEFAULT_SUPPORTED_LANGS: &[&str] = &["en", "ja"];

/// Translation backend behind a narrow seam
///
/// `change_language` resolves once translated strings are available for
/// lookup; callers sequence dependent redraws after it completes.
#[async_trait]
pub trait Localizer: Send + Sync {
    /// Switch the active language
    async fn change_language(&self, lang: &str);

    /// Resolve a message key in the active language
    fn text(&self, key: &str) -> String;
}

/// Phase of the language-change state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangPhase {
    /// No change in flight
    Idle,
    /// A change is being applied (localize, then dependent redraws)
    Applying,
}

/// Tracks the active language and validates change requests
pub struct LanguageController {
    supported: Vec<String>,
    current: String,
    phase: LangPhase,
}

impl LanguageController {
    /// Create a controller with the given supported set and initial language
    ///
    /// The initial language should already be a member of the supported set;
    /// `detect_initial` produces one.
    pub fn new(supported: Vec<String>, initial: impl Into<String>) -> Self {
        Self {
            supported,
            current: initial.into(),
            phase: LangPhase::Idle,
        }
    }

    /// The active language code
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Current phase of the state machine
    pub fn phase(&self) -> LangPhase {
        self.phase
    }

    /// Normalize a candidate to its first two characters, lowercased
    ///
    /// Candidates shorter than two characters carry no usable code and
    /// yield `None`.
    pub fn normalize(candidate: &str) -> Option<String> {
        if candidate.chars().count() < 2 {
            return None;
        }
        Some(candidate.chars().take(2).collect::<String>().to_lowercase())
    }

    /// Accept a candidate code and return the language to apply
    ///
    /// The current language changes only when the normalized candidate is a
    /// member of the supported set; otherwise the prior language is
    /// retained. Either way the resulting language is returned, so a
    /// rejected or same-language request still completes its side-effect
    /// chain against the (unchanged) active language.
    pub fn resolve(&mut self, candidate: &str) -> String {
        if let Some(proposed) = Self::normalize(candidate) {
            if self.supported.iter().any(|s| s == &proposed) {
                self.current = proposed;
            } else {
                tracing::debug!(candidate = %candidate, "Unsupported language ignored");
            }
        }
        self.current.clone()
    }

    /// Mark the start of a language application
    pub fn begin_apply(&mut self) {
        self.phase = LangPhase::Applying;
    }

    /// Mark the end of a language application
    pub fn finish_apply(&mut self) {
        self.phase = LangPhase::Idle;
    }
}

/// Detect the startup language
///
/// Preference order: an explicit choice (CLI flag), then the process
/// locale (the `LANG` environment variable, passed in by the caller), then
/// the configured default. Candidates are normalized and validated against
/// the supported set.
pub fn detect_initial(
    explicit: Option<&str>,
    env_lang: Option<&str>,
    supported: &[String],
    default: &str,
) -> String {
    for candidate in [explicit, env_lang].into_iter().flatten() {
        if let Some(normalized) = LanguageController::normalize(candidate) {
            if supported.iter().any(|s| s == &normalized) {
                return normalized;
            }
        }
    }

    default.to_string()
}

/// Catalog-backed localizer with an English base and a Japanese overlay
///
/// Keys missing from the overlay fall back to English; unknown keys fall
/// back to the key itself so a missing translation never hides data.
pub struct StaticCatalog {
    active: RwLock<String>,
}

type Table = HashMap<&'static str, &'static str>;

fn base_en() -> Table {
    let pairs: [(&str, &str); 12] = [
        ("kpi.confirmed", "Confirmed"),
        ("kpi.recovered", "Recovered"),
        ("kpi.deceased", "Deceased"),
        ("kpi.critical", "Critical"),
        ("kpi.tested", "Tested"),
        ("updated.label", "Last updated"),
        ("title.count", "{count} cases"),
        ("travel.banned", "Entry banned"),
        ("travel.visa_required", "Visa required"),
        ("travel.self_quarantine", "Self-quarantine on arrival"),
        ("travel.other", "Other restrictions"),
        ("picker.label", "Language"),
    ];
    pairs.into_iter().collect()
}

fn ja_overlay() -> Table {
    let pairs: [(&str, &str); 12] = [
        ("kpi.confirmed", "感染者数"),
        ("kpi.recovered", "回復者数"),
        ("kpi.deceased", "死亡者数"),
        ("kpi.critical", "重症者数"),
        ("kpi.tested", "検査数"),
        ("updated.label", "最終更新"),
        ("title.count", "感染者 {count} 名"),
        ("travel.banned", "入国拒否"),
        ("travel.visa_required", "ビザ必要"),
        ("travel.self_quarantine", "到着後自主隔離"),
        ("travel.other", "その他の制限"),
        ("picker.label", "言語"),
    ];
    pairs.into_iter().collect()
}

impl StaticCatalog {
    /// Create a catalog starting in the given language
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            active: RwLock::new(initial.into()),
        }
    }

    fn table_for(lang: &str) -> Table {
        let mut table = base_en();
        if lang == "ja" {
            for (k, v) in ja_overlay() {
                table.insert(k, v);
            }
        }
        table
    }
}

#[async_trait]
impl Localizer for StaticCatalog {
    async fn change_language(&self, lang: &str) {
        *self.active.write().unwrap() = lang.to_string();
    }

    fn text(&self, key: &str) -> String {
        let lang = self.active.read().unwrap().clone();
        Self::table_for(&lang)
            .get(key)
            .map(|s| s.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}
