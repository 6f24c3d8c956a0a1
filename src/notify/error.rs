//! Tipos de erro para o envio de notificações por e-mail.
//!
//! Define [`NotifyError`] com variantes para endereços inválidos, falhas ao
//! montar a mensagem e falhas do transporte SMTP. Usa `thiserror` para
//! derivar `Display` e `Error` a partir dos atributos `#[error(...)]`.
//! Esses erros nunca saem do notificador: são apenas registrados no log.

use thiserror::Error;

/// Erros que podem ocorrer ao entregar uma notificação.
///
/// - [`InvalidAddress`](NotifyError::InvalidAddress): remetente ou destinatário malformado
/// - [`Build`](NotifyError::Build): a mensagem não pôde ser montada
/// - [`Transport`](NotifyError::Transport): o servidor SMTP recusou ou estava inacessível
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Endereço de e-mail que não pôde ser interpretado.
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Falha ao montar a mensagem (cabeçalhos ausentes ou inválidos).
    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    /// Falha na camada SMTP (DNS, conexão recusada, autenticação, timeout).
    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}
