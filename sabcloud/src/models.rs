//! Structures de données pour représenter les objets du partage Mail.ru Cloud

use serde::{Deserialize, Deserializer, Serialize};

/// Désérialiseur flexible pour les champs qui peuvent être des strings ou des nombres
///
/// L'API renvoie `mtime` tantôt comme entier Unix, tantôt comme chaîne ; la
/// valeur est normalisée en chaîne pour l'affichage.
pub(crate) fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Type d'une entrée de listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Sous-dossier
    Folder,
    /// Fichier
    File,
    /// Type non reconnu (ignoré par la navigation)
    #[serde(other)]
    Other,
}

/// Une entrée (dossier ou fichier) renvoyée par le listing d'un dossier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    /// Type de l'entrée
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Nom affiché
    #[serde(default)]
    pub name: String,
    /// Chemin distant ("weblink"), éventuellement incomplet tel que livré
    #[serde(default)]
    pub weblink: String,
    /// Taille en octets (fichiers uniquement, optionnelle)
    #[serde(default)]
    pub size: Option<u64>,
    /// Date de modification, normalisée en chaîne
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub mtime: Option<String>,
}

impl Entry {
    /// Vérifie si l'entrée est un sous-dossier
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    /// Vérifie si l'entrée est un fichier
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Retourne la taille formatée en mégaoctets si elle est connue
    pub fn formatted_size(&self) -> Option<String> {
        self.size
            .map(|s| format!("{:.1} MB", s as f64 / (1024.0 * 1024.0)))
    }
}

/// Totaux d'un dossier tels que rapportés par le service
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingCounts {
    /// Nombre total de sous-dossiers
    #[serde(default)]
    pub folders: u32,
    /// Nombre total de fichiers
    #[serde(default)]
    pub files: u32,
}

/// Résultat d'une requête de listing paginée
///
/// Contient les entrées de la page demandée ainsi que les totaux du dossier
/// interrogé. L'offset de la page suivante est l'offset courant plus le
/// nombre d'entrées retournées.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Entrées de la page (dossiers et fichiers mélangés)
    pub entries: Vec<Entry>,
    /// Totaux du dossier
    pub counts: ListingCounts,
}

impl ListingPage {
    /// Itère sur les sous-dossiers de la page
    pub fn folders(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_folder())
    }

    /// Itère sur les fichiers de la page
    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_file())
    }

    /// Nombre d'entrées de la page
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Vérifie si la page est vide
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_from_wire() {
        let entry: Entry =
            serde_json::from_str(r#"{"type": "folder", "name": "2023", "weblink": "a/b/2023"}"#)
                .unwrap();
        assert!(entry.is_folder());
        assert!(!entry.is_file());
    }

    #[test]
    fn test_unknown_kind_is_tolerated() {
        let entry: Entry = serde_json::from_str(r#"{"type": "mount", "name": "x"}"#).unwrap();
        assert_eq!(entry.kind, EntryKind::Other);
    }

    #[test]
    fn test_mtime_accepts_number_and_string() {
        let a: Entry =
            serde_json::from_str(r#"{"type": "file", "name": "a.mp3", "mtime": 1700000000}"#)
                .unwrap();
        assert_eq!(a.mtime.as_deref(), Some("1700000000"));

        let b: Entry =
            serde_json::from_str(r#"{"type": "file", "name": "b.mp3", "mtime": "2023-11-14"}"#)
                .unwrap();
        assert_eq!(b.mtime.as_deref(), Some("2023-11-14"));

        let c: Entry = serde_json::from_str(r#"{"type": "file", "name": "c.mp3"}"#).unwrap();
        assert_eq!(c.mtime, None);
    }

    #[test]
    fn test_formatted_size() {
        let entry = Entry {
            kind: EntryKind::File,
            name: "a.mp3".to_string(),
            weblink: String::new(),
            size: Some(3 * 1024 * 1024 + 512 * 1024),
            mtime: None,
        };
        assert_eq!(entry.formatted_size().as_deref(), Some("3.5 MB"));
    }
}
