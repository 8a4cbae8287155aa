//! French and English user interface strings.
//!
//! Source strings are written in English and looked up in a French catalog,
//! so an untranslated string simply shows in English.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;

/// Interface language picked from `Accept-Language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Two-letter language code.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Best supported match for an `Accept-Language` value.
    ///
    /// Entries are weighed by their `q` parameter; ties keep header order.
    /// Anything unsupported or malformed falls back to English.
    pub fn negotiate(header: &str) -> Self {
        let mut best: Option<(f32, Self)> = None;
        for entry in header.split(',') {
            let mut parts = entry.split(';');
            let tag = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
            let quality = parts
                .find_map(|param| param.trim().strip_prefix("q="))
                .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok());
            let Some(quality) = quality.filter(|q| *q > 0.0) else {
                continue;
            };

            let primary = tag.split('-').next().unwrap_or_default();
            let locale = match primary {
                "fr" => Self::Fr,
                "en" => Self::En,
                _ => continue,
            };
            if best.is_none_or(|(q, _)| quality > q) {
                best = Some((quality, locale));
            }
        }
        best.map(|(_, locale)| locale).unwrap_or_default()
    }

    /// Locale for a request's headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Self::negotiate)
            .unwrap_or_default()
    }

    /// Translates an interface string.
    pub fn tr(self, text: &'static str) -> &'static str {
        match self {
            Self::En => text,
            Self::Fr => french(text).unwrap_or(text),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Locale {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

fn french(text: &str) -> Option<&'static str> {
    let translated = match text {
        "Dashboard" => "Tableau de bord",
        "Statistics" => "Statistiques",
        "Uploaded" => "Envoyés",
        "Downloaded" => "Téléchargés",
        "Info" => "Infos",
        "Settings" => "Paramètres",
        "Last downloads" => "Derniers téléchargements",
        "Last uploads" => "Derniers envois",
        "In progress" => "En cours",
        "Locks" => "Verrous",
        "Total files" => "Nombre de fichiers",
        "Total size" => "Taille totale",
        "Files" => "Fichiers",
        "Size" => "Taille",
        "Month" => "Mois",
        "Year" => "Année",
        "By month" => "Par mois",
        "By year" => "Par année",
        "Name" => "Nom",
        "Path" => "Chemin",
        "Sent" => "Envoyé",
        "Started" => "Démarré",
        "Finished" => "Terminé",
        "Search" => "Rechercher",
        "Previous" => "Précédent",
        "Next" => "Suivant",
        "Nothing to show" => "Rien à afficher",
        "Locked" => "Verrouillé",
        "Unlocked" => "Déverrouillé",
        "Unknown" => "Inconnu",
        "Since" => "Depuis",
        "First download" => "Premier téléchargement",
        "ago" => "auparavant",
        "Version" => "Version",
        "Configuration file" => "Fichier de configuration",
        "Database" => "Base de données",
        "Application" => "Application",
        "Seedbox" => "Seedbox",
        "Local" => "Local",
        "Health checks" => "Health checks",
        "Host" => "Hôte",
        "Port" => "Port",
        "Login" => "Identifiant",
        "Password" => "Mot de passe",
        "Timeout" => "Délai d'expiration",
        "Protocol" => "Protocole",
        "Permissions (chmod)" => "Permissions (chmod)",
        "Temporary path" => "Chemin temporaire",
        "Watch path" => "Chemin surveillé",
        "Finished path" => "Chemin des fichiers terminés",
        "Prefixed path" => "Chemin préfixé",
        "Part suffix" => "Suffixe des fichiers partiels",
        "Exclude from sync" => "Exclure de la synchronisation",
        "Download path" => "Chemin de téléchargement",
        "Database file" => "Fichier de base de données",
        "Enabled" => "Activé",
        "Ping URL" => "URL de ping",
        "Save" => "Enregistrer",
        "Settings saved" => "Paramètres enregistrés",
        "Configuration file is read-only" => "Le fichier de configuration est en lecture seule",
        "The configuration file cannot be modified: the form is disabled." => {
            "Le fichier de configuration ne peut pas être modifié : le formulaire est désactivé."
        }
        "Timeout must be a number" => "Le délai d'expiration doit être un nombre",
        "Missing required fields" => "Champs obligatoires manquants",
        "Port must be a number between 0 and 65535" => {
            "Le port doit être un nombre entre 0 et 65535"
        }
        "Invalid chmod value" => "Valeur de chmod invalide",
        "Settings could not be saved" => "Les paramètres n'ont pas pu être enregistrés",
        "No SeedboxSync configuration file found!" => {
            "Aucun fichier de configuration SeedboxSync trouvé !"
        }
        "Can't read SeedboxSync configuration file!" => {
            "Impossible de lire le fichier de configuration SeedboxSync !"
        }
        "Can't load seedbox database!" => "Impossible de charger la base de données seedbox !",
        "Page not found" => "Page introuvable",
        "Internal server error" => "Erreur interne du serveur",
        "The requested page does not exist." => "La page demandée n'existe pas.",
        "Back to dashboard" => "Retour au tableau de bord",
        _ => return None,
    };
    Some(translated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_prefers_highest_quality() {
        assert_eq!(Locale::negotiate("fr-FR,fr;q=0.9,en;q=0.8"), Locale::Fr);
        assert_eq!(Locale::negotiate("en-US,en;q=0.9,fr;q=0.8"), Locale::En);
        assert_eq!(Locale::negotiate("de;q=1.0,fr;q=0.5"), Locale::Fr);
        assert_eq!(Locale::negotiate("en;q=0.2,fr;q=0.7"), Locale::Fr);
    }

    #[test]
    fn test_negotiate_falls_back_to_english() {
        assert_eq!(Locale::negotiate(""), Locale::En);
        assert_eq!(Locale::negotiate("de-DE,es"), Locale::En);
        assert_eq!(Locale::negotiate("fr;q=0"), Locale::En);
        assert_eq!(Locale::negotiate("fr;q=abc"), Locale::En);
    }

    #[test]
    fn test_translation() {
        assert_eq!(Locale::Fr.tr("Dashboard"), "Tableau de bord");
        assert_eq!(Locale::En.tr("Dashboard"), "Dashboard");
        assert_eq!(Locale::Fr.tr("Not in the catalog"), "Not in the catalog");
    }
}
