use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::debounce::{Debouncer, DEBOUNCE_DELAY};
use crate::error::FlightError;
use crate::fetch::FlightSource;
use crate::suggest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteEvent {
    Changed(String),
    Selected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropdown<'a> {
    Hidden,
    Searching,
    Suggestions {
        items: &'a [String],
        highlight: Option<usize>,
    },
}

#[derive(Debug, Default)]
pub struct Autocomplete {
    value: String,
    open: bool,
    highlight: Option<usize>,
    suggestions: Vec<String>,
    corpus: Vec<String>,
    loading: bool,
    debounced: String,
}

impl Autocomplete {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            debounced: value.clone(),
            value,
            ..Default::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn highlight_index(&self) -> isize {
        self.highlight.map_or(-1, |i| i as isize)
    }

    // No events, dropdown untouched.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn input(&mut self, text: impl Into<String>) -> AutocompleteEvent {
        self.value = text.into();
        self.open = true;
        AutocompleteEvent::Changed(self.value.clone())
    }

    pub fn focus(&mut self) {
        self.open = true;
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    pub fn finish_loading(&mut self, corpus: Vec<String>) {
        self.loading = false;
        self.corpus = corpus;
        self.refilter();
    }

    pub fn apply_debounced(&mut self, query: impl Into<String>) {
        self.debounced = query.into();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.suggestions = suggest::suggestions(&self.debounced, &self.corpus);
        if self.highlight.is_some_and(|i| i >= self.suggestions.len()) {
            self.highlight = None;
        }
    }

    pub fn key(&mut self, key: Key) -> Vec<AutocompleteEvent> {
        if !self.open {
            if matches!(key, Key::ArrowDown | Key::ArrowUp) {
                self.open = true;
            }
            return Vec::new();
        }

        let last = self.suggestions.len().checked_sub(1);
        match key {
            Key::ArrowDown => {
                if let Some(last) = last {
                    self.highlight = Some(self.highlight.map_or(0, |i| (i + 1).min(last)));
                }
            }
            Key::ArrowUp => {
                if let Some(last) = last {
                    self.highlight =
                        Some(self.highlight.map_or(0, |i| i.saturating_sub(1).min(last)));
                }
            }
            Key::Enter => {
                if let Some(i) = self.highlight.filter(|i| *i < self.suggestions.len()) {
                    return self.commit(i);
                }
            }
            Key::Escape => self.open = false,
        }
        Vec::new()
    }

    pub fn hover(&mut self, index: usize) {
        if index < self.suggestions.len() {
            self.highlight = Some(index);
        }
    }

    pub fn click(&mut self, index: usize) -> Vec<AutocompleteEvent> {
        if index < self.suggestions.len() {
            self.commit(index)
        } else {
            Vec::new()
        }
    }

    pub fn pointer_down_outside(&mut self) {
        self.open = false;
    }

    fn commit(&mut self, index: usize) -> Vec<AutocompleteEvent> {
        let text = self.suggestions[index].clone();
        self.value = text.clone();
        self.open = false;
        self.highlight = None;
        vec![
            AutocompleteEvent::Changed(text.clone()),
            AutocompleteEvent::Selected(text),
        ]
    }

    pub fn dropdown(&self) -> Dropdown<'_> {
        if !self.open {
            return Dropdown::Hidden;
        }
        if self.loading {
            return Dropdown::Searching;
        }
        if self.suggestions.is_empty() {
            return Dropdown::Hidden;
        }
        Dropdown::Suggestions {
            items: &self.suggestions,
            highlight: self.highlight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    CorpusLoaded(usize),
    Filtered(String),
    Idle,
}

/// An [`Autocomplete`] wired to a corpus fetch and a debounce timer. The
/// corpus is requested once, at mount.
pub struct MountedAutocomplete {
    widget: Autocomplete,
    debouncer: Debouncer<String>,
    filtered: mpsc::UnboundedReceiver<String>,
    corpus: Option<JoinHandle<Result<Vec<String>, FlightError>>>,
}

impl MountedAutocomplete {
    pub fn mount<S>(source: Arc<S>, value: impl Into<String>) -> Self
    where
        S: FlightSource + Send + Sync + 'static,
    {
        Self::mount_with_delay(source, value, DEBOUNCE_DELAY)
    }

    pub fn mount_with_delay<S>(source: Arc<S>, value: impl Into<String>, delay: Duration) -> Self
    where
        S: FlightSource + Send + Sync + 'static,
    {
        let mut widget = Autocomplete::new(value);
        widget.begin_loading();
        let corpus = tokio::spawn(async move { source.cities().await });
        let (debouncer, filtered) = Debouncer::new(delay);
        Self {
            widget,
            debouncer,
            filtered,
            corpus: Some(corpus),
        }
    }

    pub fn widget(&self) -> &Autocomplete {
        &self.widget
    }

    pub fn value(&self) -> &str {
        self.widget.value()
    }

    pub fn has_pending_work(&self) -> bool {
        self.corpus.is_some() || self.debouncer.is_pending() || !self.filtered.is_empty()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.widget.set_value(value);
        self.debouncer.push(self.widget.value().to_string());
    }

    pub fn type_text(&mut self, text: impl Into<String>) -> AutocompleteEvent {
        let event = self.widget.input(text);
        self.debouncer.push(self.widget.value().to_string());
        event
    }

    pub fn focus(&mut self) {
        self.widget.focus();
    }

    pub fn key(&mut self, key: Key) -> Vec<AutocompleteEvent> {
        self.widget.key(key)
    }

    pub fn hover(&mut self, index: usize) {
        self.widget.hover(index);
    }

    pub fn click(&mut self, index: usize) -> Vec<AutocompleteEvent> {
        self.widget.click(index)
    }

    pub fn pointer_down_outside(&mut self) {
        self.widget.pointer_down_outside();
    }

    pub async fn settle(&mut self) -> Settled {
        if !self.has_pending_work() {
            return Settled::Idle;
        }

        let corpus = self.corpus.as_mut();
        tokio::select! {
            joined = async {
                match corpus {
                    Some(handle) => handle.await,
                    None => std::future::pending().await,
                }
            } => {
                self.corpus = None;
                let cities = match joined {
                    Ok(Ok(cities)) => cities,
                    Ok(Err(e)) => {
                        warn!(error = %e, "failed to load destination cities");
                        Vec::new()
                    }
                    Err(e) => {
                        warn!(error = %e, "destination city task ended abnormally");
                        Vec::new()
                    }
                };
                let count = cities.len();
                debug!(count, "destination corpus loaded");
                self.widget.finish_loading(cities);
                Settled::CorpusLoaded(count)
            }
            Some(query) = self.filtered.recv() => {
                self.widget.apply_debounced(query.clone());
                Settled::Filtered(query)
            }
            else => Settled::Idle,
        }
    }

    pub async fn settle_all(&mut self) {
        while self.has_pending_work() {
            self.settle().await;
        }
    }
}

impl Drop for MountedAutocomplete {
    fn drop(&mut self) {
        if let Some(handle) = self.corpus.take() {
            handle.abort();
        }
    }
}
