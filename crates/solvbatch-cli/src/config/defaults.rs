use std::ffi::OsString;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub adjacency: PathBuf,
    pub solvent_table: PathBuf,
    pub pair_list: PathBuf,
    pub report: PathBuf,
    pub program: String,
    pub main_class: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            adjacency: PathBuf::from("adjList.txt"),
            solvent_table: PathBuf::from("Solvent Database.csv"),
            pair_list: PathBuf::from("Solvent-Solute list.csv"),
            report: PathBuf::from("Solvent-Solute-Solvation_by_RMG.csv"),
            program: "java".to_string(),
            main_class: "Abraham".to_string(),
        }
    }
}

/// `classes` under the RMG installation named by `rmg_home`, or `classes` in the
/// working directory when it is unset.
pub fn default_classpath(rmg_home: Option<OsString>) -> String {
    match rmg_home.filter(|home| !home.is_empty()) {
        Some(home) => PathBuf::from(home)
            .join("classes")
            .to_string_lossy()
            .into_owned(),
        None => "classes".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classpath_follows_rmg_home() {
        assert_eq!(
            default_classpath(Some(OsString::from("/opt/RMG"))),
            "/opt/RMG/classes"
        );
        assert_eq!(default_classpath(Some(OsString::new())), "classes");
        assert_eq!(default_classpath(None), "classes");
    }
}
