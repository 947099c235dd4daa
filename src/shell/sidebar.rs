use crate::mock_data::MockData;
use crate::models::Contact;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarTab {
    Chats,
    Calls,
    Status,
}

impl SidebarTab {
    pub const ALL: [SidebarTab; 3] = [SidebarTab::Chats, SidebarTab::Calls, SidebarTab::Status];

    pub fn title(&self) -> &'static str {
        match self {
            SidebarTab::Chats => "Chats",
            SidebarTab::Calls => "Calls",
            SidebarTab::Status => "Status",
        }
    }

    fn index(&self) -> usize {
        match self {
            SidebarTab::Chats => 0,
            SidebarTab::Calls => 1,
            SidebarTab::Status => 2,
        }
    }
}

/// Tab selection, search text and a row cursor per tab.
#[derive(Debug, Clone)]
pub struct Sidebar {
    active_tab: SidebarTab,
    search: String,
    cursors: [usize; 3],
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new()
    }
}

impl Sidebar {
    pub fn new() -> Self {
        Sidebar {
            active_tab: SidebarTab::Chats,
            search: String::new(),
            cursors: [0; 3],
        }
    }

    pub fn active_tab(&self) -> SidebarTab {
        self.active_tab
    }

    pub fn set_tab(&mut self, tab: SidebarTab) {
        self.active_tab = tab;
    }

    pub fn next_tab(&mut self) {
        let i = (self.active_tab.index() + 1) % SidebarTab::ALL.len();
        self.active_tab = SidebarTab::ALL[i];
    }

    pub fn prev_tab(&mut self) {
        let len = SidebarTab::ALL.len();
        let i = (self.active_tab.index() + len - 1) % len;
        self.active_tab = SidebarTab::ALL[i];
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Updates the filter. The chat cursor goes back to the first match.
    pub fn set_search(&mut self, query: &str) {
        if self.search != query {
            self.search = query.to_string();
            self.cursors[SidebarTab::Chats.index()] = 0;
        }
    }

    /// Contacts whose name contains the search text, ignoring case.
    pub fn filtered_contacts<'a>(&self, data: &'a MockData) -> Vec<&'a Contact> {
        filter_contacts(&data.contacts, &self.search)
    }

    pub fn cursor(&self) -> usize {
        self.cursors[self.active_tab.index()]
    }

    /// Moves the cursor of the active tab, clamped to `len` rows.
    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        let slot = &mut self.cursors[self.active_tab.index()];
        if len == 0 {
            *slot = 0;
            return;
        }
        let next = (*slot as isize + delta).clamp(0, len as isize - 1);
        *slot = next as usize;
    }
}

pub fn filter_contacts<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    let needle = query.to_lowercase();
    contacts
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle() {
        let mut sidebar = Sidebar::new();
        assert_eq!(sidebar.active_tab(), SidebarTab::Chats);

        sidebar.next_tab();
        assert_eq!(sidebar.active_tab().title(), "Calls");
        sidebar.next_tab();
        sidebar.next_tab();
        assert_eq!(sidebar.active_tab(), SidebarTab::Chats);

        sidebar.prev_tab();
        assert_eq!(sidebar.active_tab(), SidebarTab::Status);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let data = MockData::builtin().unwrap();
        let mut sidebar = Sidebar::new();

        sidebar.set_search("DAV");
        let names: Vec<_> = sidebar.filtered_contacts(&data).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["John Davis"]);

        sidebar.set_search("o");
        let names: Vec<_> = sidebar.filtered_contacts(&data).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Sarah Wilson", "John Davis", "Mom"]);

        sidebar.set_search("nobody");
        assert!(sidebar.filtered_contacts(&data).is_empty());

        sidebar.set_search("");
        assert_eq!(sidebar.filtered_contacts(&data).len(), 4);
    }

    #[test]
    fn test_cursor_is_per_tab_and_clamped() {
        let mut sidebar = Sidebar::new();
        sidebar.move_cursor(10, 4);
        assert_eq!(sidebar.cursor(), 3);

        sidebar.set_tab(SidebarTab::Calls);
        assert_eq!(sidebar.cursor(), 0);
        sidebar.move_cursor(-1, 6);
        assert_eq!(sidebar.cursor(), 0);

        sidebar.set_tab(SidebarTab::Chats);
        assert_eq!(sidebar.cursor(), 3);
        sidebar.set_search("mom");
        assert_eq!(sidebar.cursor(), 0, "New search starts at the first match");
    }
}
