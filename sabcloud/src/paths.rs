//! Encodage et composition des chemins distants
//!
//! Les chemins du partage contiennent couramment espaces et ponctuation ;
//! ils doivent être encodés de façon stable pour que les URLs de streaming
//! résolvent correctement côté service.

/// Ponctuation laissée telle quelle dans les chemins encodés, en plus des
/// caractères non réservés habituels (alphanumériques, `-`, `_`, `.`)
const SAFE_PUNCTUATION: &str = "~@#$()*!=:;,.?/\\'";

/// Encode une chaîne pour l'utiliser comme composant de chemin d'URL
///
/// Les caractères alphanumériques ASCII, `-`, `_`, `.` et la liste
/// [`SAFE_PUNCTUATION`] sont conservés ; tout le reste (espaces compris) est
/// encodé en pourcent, octet par octet, en UTF-8.
pub fn encode_path_segment(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') || SAFE_PUNCTUATION.contains(c) {
            result.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).as_bytes() {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    result
}

/// Retourne le chemin canonique d'une entrée enfant
///
/// Le `weblink` livré par le service est parfois incomplet (il ne se termine
/// pas toujours par le nom de l'entrée). Si nécessaire, `/{name}` est ajouté,
/// puis les slashs de tête et de queue sont retirés.
///
/// Retourne une chaîne vide si l'entrée ne porte aucun chemin ; l'appelant
/// doit alors la considérer comme non navigable.
pub fn normalize_child_path(weblink: &str, name: &str) -> String {
    if weblink.is_empty() {
        return String::new();
    }
    let mut path = weblink.to_string();
    if !name.is_empty() && !path.ends_with(&format!("/{}", name)) {
        path = format!("{}/{}", path.trim_end_matches('/'), name);
    }
    path.trim_matches('/').to_string()
}

/// Construit l'URL de streaming finale d'un fichier
///
/// Fonction déterministe de ses trois entrées, sans effet de bord :
/// `{base_url}/{chemin normalisé encodé}?key={token}`.
pub fn build_stream_url(base_url: &str, token: &str, file_path: &str) -> String {
    format!(
        "{}/{}?key={}",
        base_url.trim_end_matches('/'),
        encode_path_segment(file_path.trim_matches('/')),
        token
    )
}
