//! Navigation state for one browsing session
//!
//! A [`NavSession`] owns everything one interaction cycle needs: the folder
//! stack, the accumulated sorted listings, the load offset, the search
//! filter and the current selection. It is an explicit object passed to
//! every operation, not ambient global state, so the navigation logic stays
//! testable in isolation from any rendering layer.
//!
//! Invariants:
//! - the stack is never empty; the root share is always the first element
//!   and is never popped;
//! - every navigation mutation (push, pop, reset, share change) clears the
//!   offset, both accumulations, the reported totals and the selection as a
//!   unit.

use crate::config_ext::SessionConfigExt;
use crate::error::Result;
use crate::ordering;
use crate::progress::ProgressStore;
use sabcloud::{normalize_child_path, CloudClient, Entry, ListingCounts, ListingPage};
use sabconfig::Config;
use tracing::{debug, info};

/// Default number of entries fetched per listing page
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// One browsing session over a public share
#[derive(Debug)]
pub struct NavSession {
    /// Root share path (slashes trimmed)
    share: String,
    /// Folder stack, root first; never empty
    stack: Vec<String>,
    /// Accumulated subfolders of the current directory, sorted
    folders: Vec<Entry>,
    /// Accumulated files of the current directory, sorted
    files: Vec<Entry>,
    /// Offset of the next page to fetch; equals the number of entries
    /// fetched so far for the current directory
    offset: usize,
    /// Directory totals as most recently reported by the service
    counts: ListingCounts,
    /// Active search filter (substring on file names)
    filter: String,
    /// Currently selected file name
    selected: Option<String>,
    /// Monotonic interaction counter
    tick: u64,
    /// Page size used for listing requests
    page_size: usize,
}

impl NavSession {
    /// Create a session rooted at the given share
    pub fn new(share: &str, page_size: usize) -> Self {
        let share = share.trim().trim_matches('/').to_string();
        Self {
            stack: vec![share.clone()],
            share,
            folders: Vec::new(),
            files: Vec::new(),
            offset: 0,
            counts: ListingCounts::default(),
            filter: String::new(),
            selected: None,
            tick: 0,
            page_size,
        }
    }

    /// Create a session from the configured share and page size
    pub fn from_config(config: &Config) -> Result<Self> {
        use sabcloud::CloudConfigExt;
        let share = config.get_cloud_share()?;
        let page_size = config.get_page_size()?;
        Ok(Self::new(&share, page_size))
    }

    // ========================================================================
    // Interaction progression
    // ========================================================================

    /// Advance the interaction counter and return the new tick
    ///
    /// Called once at the start of every user interaction; the tick ages the
    /// download token.
    pub fn begin_interaction(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Current interaction tick
    pub fn tick(&self) -> u64 {
        self.tick
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// The root share of this session
    pub fn share(&self) -> &str {
        &self.share
    }

    /// The directory currently displayed (top of the stack)
    pub fn current(&self) -> &str {
        self.stack.last().expect("navigation stack is never empty")
    }

    /// The full navigation path, root first
    pub fn path(&self) -> &[String] {
        &self.stack
    }

    /// Whether the session is below the root
    pub fn can_go_up(&self) -> bool {
        self.stack.len() > 1
    }

    /// Open a subfolder of the current directory
    ///
    /// Returns `false` when the entry carries no usable remote path and is
    /// therefore not navigable; the session is left untouched in that case.
    pub fn open_folder(&mut self, entry: &Entry) -> bool {
        let child = normalize_child_path(&entry.weblink, &entry.name);
        if child.is_empty() {
            debug!("Folder entry {:?} has no weblink, not navigable", entry.name);
            return false;
        }
        info!("Opening folder {}", child);
        self.stack.push(child);
        self.reset_listing();
        true
    }

    /// Go up one level; the root is never popped
    pub fn up(&mut self) -> bool {
        if !self.can_go_up() {
            return false;
        }
        self.stack.pop();
        self.reset_listing();
        true
    }

    /// Reset the session to the root share
    pub fn reset_to_root(&mut self) {
        self.stack.truncate(1);
        self.reset_listing();
    }

    /// Switch to another share
    ///
    /// No-op when the trimmed share is unchanged; otherwise the whole session
    /// restarts at the new root.
    pub fn set_share(&mut self, share: &str) {
        let share = share.trim().trim_matches('/').to_string();
        if share.is_empty() || share == self.share {
            return;
        }
        info!("Switching share to {}", share);
        self.share = share.clone();
        self.stack = vec![share];
        self.reset_listing();
    }

    /// Forget the loaded view so the next interaction refetches everything
    ///
    /// Combined with [`CloudClient::clear_caches`] this is the "refresh now"
    /// action.
    pub fn refresh(&mut self, client: &CloudClient) {
        client.clear_caches();
        self.reset_listing();
    }

    /// Clears offset, accumulations, totals and selection as a unit
    fn reset_listing(&mut self) {
        self.offset = 0;
        self.folders.clear();
        self.files.clear();
        self.counts = ListingCounts::default();
        self.selected = None;
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Whether nothing has been loaded yet for the current directory
    pub fn needs_first_page(&self) -> bool {
        self.offset == 0 && self.folders.is_empty() && self.files.is_empty()
    }

    /// Load the first page of the current directory if nothing is loaded yet
    ///
    /// Guards against a duplicate initial fetch: returns `false` without any
    /// request when data is already present.
    pub async fn load_first_page(&mut self, client: &CloudClient) -> Result<bool> {
        if !self.needs_first_page() {
            return Ok(false);
        }
        let page = client.fetch_page(self.current(), 0, self.page_size).await?;
        self.apply_page(page);
        Ok(true)
    }

    /// Load the next page of the current directory
    ///
    /// Fetches at the current offset, merges through the ordering engine and
    /// advances the offset by the number of items just fetched. Returns that
    /// number.
    pub async fn load_more(&mut self, client: &CloudClient) -> Result<usize> {
        let page = client
            .fetch_page(self.current(), self.offset, self.page_size)
            .await?;
        let fetched = page.len();
        self.apply_page(page);
        Ok(fetched)
    }

    /// Merge one listing page into the accumulated view
    ///
    /// The most recently reported totals win wholesale; stale totals from an
    /// earlier call are overwritten.
    pub fn apply_page(&mut self, page: ListingPage) {
        self.offset += page.len();
        self.counts = page.counts;

        let (folders, files): (Vec<Entry>, Vec<Entry>) =
            page.entries.into_iter().partition(Entry::is_folder);
        ordering::merge_folders(&mut self.folders, folders);
        ordering::merge_files(
            &mut self.files,
            files.into_iter().filter(Entry::is_file),
        );

        debug!(
            "Loaded {}/{} files, {}/{} folders of {}",
            self.files.len(),
            self.counts.files,
            self.folders.len(),
            self.counts.folders,
            self.current()
        );
    }

    /// Adopt freshly reported directory totals
    ///
    /// The service may report different counts across calls when the
    /// directory changed remotely; the most recent report wins.
    pub fn set_counts(&mut self, counts: ListingCounts) {
        self.counts = counts;
    }

    /// Whether more file pages remain according to the reported totals
    pub fn has_more(&self) -> bool {
        self.files.len() < self.counts.files as usize
    }

    /// Offset of the next page (number of entries fetched so far)
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Directory totals as most recently reported
    pub fn counts(&self) -> ListingCounts {
        self.counts
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Accumulated sorted subfolders
    pub fn folders(&self) -> &[Entry] {
        &self.folders
    }

    /// Accumulated sorted files
    pub fn files(&self) -> &[Entry] {
        &self.files
    }

    /// Active search filter
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Set the search filter (a view concern; the loaded set is untouched)
    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.trim().to_string();
    }

    /// Files matching the active filter, in accumulated order
    pub fn filtered_files(&self) -> Vec<&Entry> {
        ordering::filter_files(&self.files, &self.filter)
    }

    /// Names of the files matching the active filter
    pub fn filtered_names(&self) -> Vec<String> {
        self.filtered_files()
            .into_iter()
            .map(|e| e.name.clone())
            .collect()
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Currently selected file name
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a file by name
    pub fn select(&mut self, name: &str) {
        self.selected = Some(name.to_string());
    }

    /// Advance the selection to the next file of the filtered view
    ///
    /// Saturates at the last file; selects the first file when nothing is
    /// selected yet. Returns the new selection.
    pub fn select_next(&mut self) -> Option<String> {
        let names = self.filtered_names();
        if names.is_empty() {
            return None;
        }
        let next = match self.selected.as_ref().and_then(|s| names.iter().position(|n| n == s)) {
            Some(idx) => names[(idx + 1).min(names.len() - 1)].clone(),
            None => names[0].clone(),
        };
        self.selected = Some(next.clone());
        Some(next)
    }

    /// Resolve the selection to start the interaction with
    ///
    /// The remembered episode for the current folder wins; else the previous
    /// selection when still visible; else the first file of the filtered
    /// view.
    pub fn default_selection(&self, store: &ProgressStore) -> Option<String> {
        let names = self.filtered_names();
        if names.is_empty() {
            return None;
        }
        if let Some(remembered) = store.pick_last(self.current(), &names) {
            return Some(remembered);
        }
        if let Some(previous) = &self.selected {
            if names.iter().any(|n| n == previous) {
                return Some(previous.clone());
            }
        }
        names.first().cloned()
    }

    /// The entry backing the current selection, if visible
    pub fn selected_entry(&self) -> Option<&Entry> {
        let selected = self.selected.as_deref()?;
        self.filtered_files().into_iter().find(|e| e.name == selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sabcloud::EntryKind;

    fn file(name: &str) -> Entry {
        Entry {
            kind: EntryKind::File,
            name: name.to_string(),
            weblink: format!("root/{}", name),
            size: None,
            mtime: None,
        }
    }

    fn folder(name: &str, weblink: &str) -> Entry {
        Entry {
            kind: EntryKind::Folder,
            name: name.to_string(),
            weblink: weblink.to_string(),
            size: None,
            mtime: None,
        }
    }

    fn page(entries: Vec<Entry>, folders: u32, files: u32) -> ListingPage {
        ListingPage {
            entries,
            counts: ListingCounts { folders, files },
        }
    }

    fn loaded_session() -> NavSession {
        let mut session = NavSession::new("root", 200);
        session.apply_page(page(
            vec![
                folder("2023", "root/2023"),
                file("Modern_Sabahlar_01_02_23.mp3"),
                file("Modern_Sabahlar_15_01_23.mp3"),
                file("random.mp3"),
            ],
            1,
            3,
        ));
        session
    }

    #[test]
    fn test_share_is_trimmed_and_stack_rooted() {
        let session = NavSession::new("  /root/share/ ", 200);
        assert_eq!(session.share(), "root/share");
        assert_eq!(session.current(), "root/share");
        assert_eq!(session.path(), ["root/share".to_string()]);
    }

    #[test]
    fn test_root_is_never_popped() {
        let mut session = NavSession::new("root", 200);
        assert!(!session.up());
        assert_eq!(session.current(), "root");
    }

    #[test]
    fn test_open_folder_pushes_normalized_child() {
        let mut session = loaded_session();
        let child = folder("2022", "root/2022");
        assert!(session.open_folder(&child));
        assert_eq!(session.current(), "root/2022");
        assert!(session.can_go_up());
    }

    #[test]
    fn test_open_folder_without_weblink_is_rejected() {
        let mut session = loaded_session();
        let child = folder("ghost", "");
        assert!(!session.open_folder(&child));
        assert_eq!(session.current(), "root");
        // La session n'a pas été réinitialisée
        assert_eq!(session.files().len(), 3);
    }

    #[test]
    fn test_navigation_resets_everything_as_a_unit() {
        let mut session = loaded_session();
        session.select("random.mp3");
        assert!(session.offset() > 0);

        let child = folder("2022", "root/2022");
        session.open_folder(&child);

        assert_eq!(session.offset(), 0);
        assert!(session.folders().is_empty());
        assert!(session.files().is_empty());
        assert_eq!(session.counts(), ListingCounts::default());
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_set_share_restarts_session() {
        let mut session = loaded_session();
        session.set_share("/other/");
        assert_eq!(session.share(), "other");
        assert_eq!(session.path(), ["other".to_string()]);
        assert!(session.needs_first_page());
    }

    #[test]
    fn test_set_share_same_value_is_noop() {
        let mut session = loaded_session();
        session.set_share(" root ");
        assert_eq!(session.files().len(), 3);
        assert!(!session.needs_first_page());
    }

    #[test]
    fn test_apply_page_merges_and_counts_offset() {
        let mut session = loaded_session();
        assert_eq!(session.offset(), 4);

        session.apply_page(page(vec![file("Modern_Sabahlar_20_01_23.mp3")], 1, 4));
        assert_eq!(session.offset(), 5);
        // Tri global re-calculé sur l'ensemble accumulé
        let names: Vec<_> = session.files().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Modern_Sabahlar_15_01_23.mp3",
                "Modern_Sabahlar_20_01_23.mp3",
                "Modern_Sabahlar_01_02_23.mp3",
                "random.mp3"
            ]
        );
    }

    #[test]
    fn test_most_recent_counts_win() {
        let mut session = loaded_session();
        session.apply_page(page(vec![], 2, 10));
        assert_eq!(session.counts(), ListingCounts { folders: 2, files: 10 });
        assert!(session.has_more());
    }

    #[test]
    fn test_has_more_compares_files_to_total() {
        let session = loaded_session();
        assert!(!session.has_more());
    }

    #[test]
    fn test_needs_first_page_guard() {
        let session = NavSession::new("root", 200);
        assert!(session.needs_first_page());
        let session = loaded_session();
        assert!(!session.needs_first_page());
    }

    #[test]
    fn test_filter_is_a_view_only() {
        let mut session = loaded_session();
        session.set_filter("SABAHLAR");
        assert_eq!(session.filtered_files().len(), 2);
        assert_eq!(session.files().len(), 3);
        session.set_filter("");
        assert_eq!(session.filtered_files().len(), 3);
    }

    #[test]
    fn test_select_next_saturates() {
        let mut session = loaded_session();
        assert_eq!(
            session.select_next().as_deref(),
            Some("Modern_Sabahlar_15_01_23.mp3")
        );
        session.select("random.mp3");
        assert_eq!(session.select_next().as_deref(), Some("random.mp3"));
    }

    #[test]
    fn test_default_selection_prefers_remembered_episode() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));
        store.update("root", "random.mp3").unwrap();

        let session = loaded_session();
        assert_eq!(
            session.default_selection(&store).as_deref(),
            Some("random.mp3")
        );
    }

    #[test]
    fn test_default_selection_falls_back_to_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));

        let session = loaded_session();
        assert_eq!(
            session.default_selection(&store).as_deref(),
            Some("Modern_Sabahlar_15_01_23.mp3")
        );
    }

    #[test]
    fn test_ticks_are_monotonic() {
        let mut session = NavSession::new("root", 200);
        assert_eq!(session.begin_interaction(), 1);
        assert_eq!(session.begin_interaction(), 2);
        assert_eq!(session.tick(), 2);
    }

    #[test]
    fn test_selected_entry_resolves_through_filter() {
        let mut session = loaded_session();
        session.select("random.mp3");
        assert_eq!(session.selected_entry().map(|e| e.name.as_str()), Some("random.mp3"));

        session.set_filter("sabahlar");
        assert_eq!(session.selected_entry(), None);
    }
}
