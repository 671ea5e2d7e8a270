use tracing::debug;

use crate::error::StorageError;
use crate::storage::{Storage, LAST_TAB_KEY};

/// Dashboard sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Progress,
    Exercise,
    Chat,
    Report,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Overview, Tab::Progress, Tab::Exercise, Tab::Chat, Tab::Report];

    /// Identifier persisted under `last_tab`
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Progress => "progresso",
            Tab::Exercise => "exercicio",
            Tab::Chat => "chat",
            Tab::Report => "relatorio",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Visão geral",
            Tab::Progress => "Progresso",
            Tab::Exercise => "Exercício",
            Tab::Chat => "Chat",
            Tab::Report => "Relatório",
        }
    }

    /// Next tab within `available`, wrapping around
    pub fn next_in(&self, available: &[Tab]) -> Self {
        match available.iter().position(|t| t == self) {
            Some(i) => available[(i + 1) % available.len()],
            None => available.first().copied().unwrap_or(*self),
        }
    }

    /// Previous tab within `available`, wrapping around
    pub fn prev_in(&self, available: &[Tab]) -> Self {
        match available.iter().position(|t| t == self) {
            Some(i) => available[(i + available.len() - 1) % available.len()],
            None => available.first().copied().unwrap_or(*self),
        }
    }
}

/// Tab to show when a dashboard opens: the remembered one if this dashboard
/// has it, else overview, else progress.
pub fn restore_tab(storage: &dyn Storage, available: &[Tab]) -> Tab {
    let remembered = storage
        .get(LAST_TAB_KEY)
        .and_then(|id| Tab::from_id(&id))
        .filter(|tab| available.contains(tab));

    if let Some(tab) = remembered {
        return tab;
    }
    debug!("No usable remembered tab, using fallback");
    if available.contains(&Tab::Overview) {
        Tab::Overview
    } else if available.contains(&Tab::Progress) {
        Tab::Progress
    } else {
        available.first().copied().unwrap_or(Tab::Progress)
    }
}

/// Remember `tab` as the last selected one
pub fn remember_tab(storage: &mut dyn Storage, tab: Tab) -> Result<(), StorageError> {
    storage.set(LAST_TAB_KEY, tab.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    const STUDENT: [Tab; 5] = [Tab::Overview, Tab::Progress, Tab::Exercise, Tab::Chat, Tab::Report];
    const GUARDIAN: [Tab; 3] = [Tab::Progress, Tab::Chat, Tab::Report];

    #[test]
    fn test_tab_ids_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_id(tab.id()), Some(tab));
        }
        assert_eq!(Tab::from_id("settings"), None);
    }

    #[test]
    fn test_next_in_wraps() {
        assert_eq!(Tab::Overview.next_in(&STUDENT), Tab::Progress);
        assert_eq!(Tab::Report.next_in(&STUDENT), Tab::Overview);
        assert_eq!(Tab::Report.next_in(&GUARDIAN), Tab::Progress);
    }

    #[test]
    fn test_prev_in_wraps() {
        assert_eq!(Tab::Overview.prev_in(&STUDENT), Tab::Report);
        assert_eq!(Tab::Chat.prev_in(&GUARDIAN), Tab::Progress);
        assert_eq!(Tab::Progress.prev_in(&GUARDIAN), Tab::Report);
    }

    #[test]
    fn test_restore_remembered_tab() {
        let mut storage = MemoryStorage::new();
        remember_tab(&mut storage, Tab::Chat).unwrap();
        assert_eq!(storage.get(LAST_TAB_KEY).as_deref(), Some("chat"));
        assert_eq!(restore_tab(&storage, &STUDENT), Tab::Chat);
    }

    #[test]
    fn test_restore_falls_back_to_overview() {
        let storage = MemoryStorage::new();
        assert_eq!(restore_tab(&storage, &STUDENT), Tab::Overview);
    }

    #[test]
    fn test_restore_falls_back_to_progress_without_overview() {
        let mut storage = MemoryStorage::new();
        remember_tab(&mut storage, Tab::Exercise).unwrap();
        // Guardian dashboard has no exercise tab and no overview
        assert_eq!(restore_tab(&storage, &GUARDIAN), Tab::Progress);
    }

    #[test]
    fn test_restore_ignores_garbage() {
        let mut storage = MemoryStorage::new();
        storage.set(LAST_TAB_KEY, "<script>").unwrap();
        assert_eq!(restore_tab(&storage, &STUDENT), Tab::Overview);
    }
}
