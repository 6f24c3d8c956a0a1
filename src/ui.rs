//! Interface de terminal do helpdesk: spinners e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner enquanto o servidor responde e
//! `console` para estilização com cores. O [`RequestProgress`] acompanha
//! visualmente uma requisição feita pela CLI.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::types::SubmitQueryResponse;
use crate::ticket::{TicketStatus, TicketStatusView};

/// Indicador visual de uma requisição ao servidor do helpdesk.
///
/// Exibe um spinner animado enquanto aguarda e mensagens coloridas para
/// sucesso (verde) e falha (vermelho).
pub struct RequestProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl RequestProgress {
    /// Inicia o spinner com a mensagem fornecida.
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Finaliza o spinner e exibe o ticket criado.
    pub fn submitted(&self, response: &SubmitQueryResponse) {
        self.pb.finish_and_clear();
        println!("  {} {}", self.green.apply_to("✓"), response.message);
        println!("    Ticket ID: {}", self.green.apply_to(&response.ticket_id));
        println!("    Routed to: {}", response.routed_to);
    }

    /// Finaliza o spinner e exibe o status do ticket, colorido conforme o estado.
    pub fn status(&self, view: &TicketStatusView) {
        self.pb.finish_and_clear();
        let style = match view.status {
            TicketStatus::Resolved => &self.green,
            TicketStatus::InProgress => &self.yellow,
            TicketStatus::New => &self.red,
        };
        println!("  {} - {}", view.ticket_id, view.subject);
        println!("    Status:  {}", style.apply_to(view.status));
        println!("    Created: {}", view.created_at.format("%Y-%m-%d %H:%M UTC"));
    }

    /// Finaliza o spinner e exibe a falha em vermelho.
    pub fn failed(&self, reason: &str) {
        self.pb.finish_and_clear();
        eprintln!("  {} {reason}", self.red.apply_to("✗"));
    }
}

/// Imprime o departamento escolhido para um texto.
pub fn print_classification(label: &str, address: &str, is_fallback: bool) {
    let style = if is_fallback {
        Style::new().yellow()
    } else {
        Style::new().green().bold()
    };
    println!("{}", style.apply_to(label));
    println!("  notify: {address}");
    if is_fallback {
        println!("  (no keyword matched; default department)");
    }
}
