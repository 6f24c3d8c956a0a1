//! Interface de linha de comando do helpdesk baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (serve, classify,
//! submit, status) e flags globais (--config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::client::DEFAULT_SERVER;
use crate::config::DEFAULT_CONFIG_FILE;

/// helpdesk: roteador de tickets por palavras-chave com notificações por e-mail.
#[derive(Debug, Parser)]
#[command(name = "helpdesk", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inicia o servidor HTTP.
    Serve {
        /// Endereço de escuta (sobrepõe `bind` da configuração).
        #[arg(long)]
        bind: Option<String>,

        /// Arquivo SQLite (sobrepõe `database` da configuração).
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Mostra para qual departamento um texto seria roteado.
    Classify {
        /// Texto da consulta.
        text: String,
    },

    /// Envia uma consulta a um servidor em execução.
    Submit {
        #[arg(long)]
        email: String,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        body: String,

        /// URL base do servidor.
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },

    /// Consulta o status de um ticket pelo seu identificador público.
    Status {
        /// Identificador do ticket (ex.: TICKET-1a2b3c4d).
        ticket_id: String,

        /// URL base do servidor.
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
}
