//! Tri et filtrage des entrées chargées
//!
//! Les dossiers sont triés par nom, insensible à la casse. Les fichiers
//! suivent un tri à deux niveaux : les épisodes datés
//! (`Modern_Sabahlar_JJ_MM_AA.mp3`) d'abord, en ordre chronologique, puis les
//! autres fichiers par nom. Chaque page supplémentaire est fusionnée en
//! re-triant l'ensemble accumulé, pas seulement la page reçue.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use sabcloud::Entry;

lazy_static! {
    /// Motif des épisodes datés : jour, mois, année sur deux chiffres
    static ref EPISODE_RE: Regex =
        Regex::new(r"(?i)Modern[_ ]Sabahlar[_ ](\d{2})_(\d{2})_(\d{2})\.mp3$").unwrap();
}

/// Décode la date d'un nom d'épisode
///
/// Les années sur deux chiffres sont interprétées avec une coupure à 70 :
/// `69` → 2069, `70` → 1970. Les dates invalides (jour ou mois hors plage)
/// sont traitées comme des noms non datés.
pub fn parse_episode_date(name: &str) -> Option<NaiveDate> {
    let caps = EPISODE_RE.captures(name.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let yy: i32 = caps[3].parse().ok()?;
    let year = if yy < 70 { 2000 + yy } else { 1900 + yy };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Clé de tri d'un fichier : épisodes datés d'abord (chronologiques),
/// puis les autres par nom, la casse étant ignorée partout
fn file_sort_key(entry: &Entry) -> (u8, Option<NaiveDate>, String) {
    let name = entry.name.trim();
    match parse_episode_date(name) {
        Some(date) => (0, Some(date), name.to_lowercase()),
        None => (1, None, name.to_lowercase()),
    }
}

/// Trie les sous-dossiers par nom, insensible à la casse (tri stable)
pub fn sort_folders(folders: &mut [Entry]) {
    folders.sort_by_key(|e| e.name.to_lowercase());
}

/// Trie les fichiers selon la clé à deux niveaux (tri stable)
pub fn sort_files(files: &mut [Entry]) {
    files.sort_by_key(file_sort_key);
}

/// Fusionne une page de sous-dossiers dans l'accumulation triée
pub fn merge_folders(accumulated: &mut Vec<Entry>, incoming: impl IntoIterator<Item = Entry>) {
    accumulated.extend(incoming);
    sort_folders(accumulated);
}

/// Fusionne une page de fichiers dans l'accumulation triée
pub fn merge_files(accumulated: &mut Vec<Entry>, incoming: impl IntoIterator<Item = Entry>) {
    accumulated.extend(incoming);
    sort_files(accumulated);
}

/// Filtre les fichiers par sous-chaîne du nom, insensible à la casse
///
/// Un filtre vide laisse tout passer. Le filtrage est une vue : il ne touche
/// jamais l'accumulation chargée.
pub fn filter_files<'a>(files: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    let needle = query.trim().to_lowercase();
    files
        .iter()
        .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sabcloud::EntryKind;

    fn file(name: &str) -> Entry {
        Entry {
            kind: EntryKind::File,
            name: name.to_string(),
            weblink: format!("share/{}", name),
            size: None,
            mtime: None,
        }
    }

    fn folder(name: &str) -> Entry {
        Entry {
            kind: EntryKind::Folder,
            name: name.to_string(),
            weblink: format!("share/{}", name),
            size: None,
            mtime: None,
        }
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_parse_episode_date() {
        assert_eq!(
            parse_episode_date("Modern_Sabahlar_15_01_23.mp3"),
            NaiveDate::from_ymd_opt(2023, 1, 15)
        );
        // Séparateur espace et casse mélangée acceptés
        assert_eq!(
            parse_episode_date("modern sabahlar 01_02_23.MP3"),
            NaiveDate::from_ymd_opt(2023, 2, 1)
        );
        assert_eq!(parse_episode_date("random.mp3"), None);
        // Date hors plage : traitée comme non datée
        assert_eq!(parse_episode_date("Modern_Sabahlar_32_13_23.mp3"), None);
    }

    #[test]
    fn test_two_digit_year_cutoff() {
        assert_eq!(
            parse_episode_date("Modern_Sabahlar_01_01_69.mp3"),
            NaiveDate::from_ymd_opt(2069, 1, 1)
        );
        assert_eq!(
            parse_episode_date("Modern_Sabahlar_01_01_70.mp3"),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
    }

    #[test]
    fn test_file_ordering_dated_then_named() {
        let mut files = vec![
            file("Modern_Sabahlar_01_02_23.mp3"),
            file("Modern_Sabahlar_15_01_23.mp3"),
            file("random.mp3"),
        ];
        sort_files(&mut files);
        assert_eq!(
            names(&files),
            vec![
                "Modern_Sabahlar_15_01_23.mp3",
                "Modern_Sabahlar_01_02_23.mp3",
                "random.mp3"
            ]
        );
    }

    #[test]
    fn test_undated_files_sorted_by_name_case_insensitive() {
        let mut files = vec![file("Zeta.mp3"), file("alpha.mp3"), file("Beta.mp3")];
        sort_files(&mut files);
        assert_eq!(names(&files), vec!["alpha.mp3", "Beta.mp3", "Zeta.mp3"]);
    }

    #[test]
    fn test_folder_ordering() {
        let mut folders = vec![folder("b"), folder("A"), folder("c")];
        sort_folders(&mut folders);
        assert_eq!(names(&folders), vec!["A", "b", "c"]);
    }

    #[test]
    fn test_merge_keeps_global_order_across_pages() {
        let mut acc = vec![file("Modern_Sabahlar_01_03_23.mp3")];
        sort_files(&mut acc);
        merge_files(
            &mut acc,
            vec![file("Modern_Sabahlar_15_01_23.mp3"), file("aaa.mp3")],
        );
        assert_eq!(
            names(&acc),
            vec![
                "Modern_Sabahlar_15_01_23.mp3",
                "Modern_Sabahlar_01_03_23.mp3",
                "aaa.mp3"
            ]
        );
    }

    #[test]
    fn test_filter_is_a_view() {
        let files = vec![file("Modern_Sabahlar_15_01_23.mp3"), file("random.mp3")];
        let matching = filter_files(&files, "RANDOM");
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, "random.mp3");
        // L'accumulation n'est pas touchée
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let files = vec![file("a.mp3"), file("b.mp3")];
        assert_eq!(filter_files(&files, "").len(), 2);
        assert_eq!(filter_files(&files, "   ").len(), 2);
    }
}
