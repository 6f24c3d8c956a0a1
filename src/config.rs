//! Configuração do helpdesk carregada a partir de `helpdesk.toml`.
//!
//! A struct [`HelpdeskConfig`] contém a tabela ordenada de departamentos,
//! o departamento padrão, o endereço de escuta, o banco de dados e o SMTP.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! Variáveis de ambiente `HELPDESK_*` têm precedência sobre o arquivo.

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::HelpdeskError;

/// Arquivo de configuração procurado quando `--config` não é informado.
pub const DEFAULT_CONFIG_FILE: &str = "helpdesk.toml";

/// Configuração de nível superior carregada de `helpdesk.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct HelpdeskConfig {
    /// Endereço onde o servidor HTTP escuta.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Caminho do arquivo SQLite com os tickets.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Rótulo usado quando nenhuma palavra-chave corresponde.
    #[serde(default = "default_department")]
    pub default_department: String,

    /// Endereço de e-mail do departamento padrão.
    #[serde(default = "default_address")]
    pub default_address: String,

    /// Departamentos em ordem de prioridade; o primeiro que casar vence.
    #[serde(default = "default_departments")]
    pub departments: Vec<DepartmentConfig>,

    /// Transporte SMTP; ausente significa apenas registrar as notificações no log.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// Um departamento: rótulo, endereço de notificação e palavras-chave.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DepartmentConfig {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Parâmetros do servidor SMTP de saída.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,

    /// Porta do servidor; 465 (TLS implícito) por padrão.
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Usa TLS implícito com autenticação; `false` para relays locais sem TLS.
    #[serde(default = "default_smtp_tls")]
    pub tls: bool,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Remetente das mensagens (cabeçalho `From`).
    pub from: String,
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_database() -> PathBuf {
    PathBuf::from("queries.db")
}

fn default_department() -> String {
    "General Inquiries".to_string()
}

fn default_address() -> String {
    "help@yourcollege.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_smtp_tls() -> bool {
    true
}

// Tabela padrão de roteamento do helpdesk da faculdade.
fn default_departments() -> Vec<DepartmentConfig> {
    let table: &[(&str, &str, &[&str])] = &[
        (
            "Admissions",
            "admissions@yourcollege.com",
            &["admission", "apply", "application", "enrollment", "prospectus"],
        ),
        (
            "Finance",
            "finance@yourcollege.com",
            &["fees", "payment", "scholarship", "invoice", "billing", "refund", "finance"],
        ),
        (
            "Academics",
            "academics@yourcollege.com",
            &["exam", "grades", "transcript", "courses", "classes", "syllabus"],
        ),
        (
            "IT Support",
            "it.support@yourcollege.com",
            &["wifi", "password", "login", "email", "software", "computer"],
        ),
        (
            "Library",
            "library@yourcollege.com",
            &["books", "journal", "borrow", "return", "library card"],
        ),
    ];

    table
        .iter()
        .map(|&(name, address, keywords)| DepartmentConfig {
            name: name.to_string(),
            address: address.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}

impl Default for HelpdeskConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            database: default_database(),
            default_department: default_department(),
            default_address: default_address(),
            departments: default_departments(),
            smtp: None,
        }
    }
}

impl HelpdeskConfig {
    /// Carrega a configuração do caminho fornecido.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<HelpdeskConfig>(&contents)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Aplica as variáveis `HELPDESK_*` obtidas por `lookup`; valores vazios são ignorados.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(bind) = get("HELPDESK_BIND") {
            self.bind = bind;
        }
        if let Some(database) = get("HELPDESK_DATABASE") {
            self.database = PathBuf::from(database);
        }
        if let Some(password) = get("HELPDESK_SMTP_PASSWORD") {
            if let Some(smtp) = self.smtp.as_mut() {
                smtp.password = password;
            }
        }
    }

    /// Rejeita tabelas que quebrariam o roteamento: rótulos vazios, duplicados
    /// ou iguais ao departamento padrão, endereços ausentes e palavras-chave vazias.
    pub fn validate(&self) -> Result<(), HelpdeskError> {
        if self.default_department.trim().is_empty() {
            return Err(HelpdeskError::Config("default_department is empty".into()));
        }
        if self.default_address.trim().is_empty() {
            return Err(HelpdeskError::Config("default_address is empty".into()));
        }

        let mut seen = HashSet::new();
        for dept in &self.departments {
            if dept.name.trim().is_empty() {
                return Err(HelpdeskError::Config("department with empty name".into()));
            }
            if dept.name == self.default_department {
                return Err(HelpdeskError::Config(format!(
                    "department '{}' has the same name as default_department",
                    dept.name
                )));
            }
            if !seen.insert(dept.name.as_str()) {
                return Err(HelpdeskError::Config(format!(
                    "department '{}' declared twice",
                    dept.name
                )));
            }
            if dept.address.trim().is_empty() {
                return Err(HelpdeskError::Config(format!(
                    "department '{}' has no address",
                    dept.name
                )));
            }
            if dept.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(HelpdeskError::Config(format!(
                    "department '{}' has an empty keyword",
                    dept.name
                )));
            }
        }

        if let Some(smtp) = &self.smtp {
            if smtp.host.trim().is_empty() || smtp.from.trim().is_empty() {
                return Err(HelpdeskError::Config("smtp needs host and from".into()));
            }
        }

        Ok(())
    }
}
