//! The host surface the document-analysis UI talks to.
//!
//! The shell owns the flow controller plus the session's document history.
//! Document semantics never originate here - the host reports analysis
//! outcomes and the shell routes them into the controller's app-error
//! channel, so an analysis failure surfaces exactly like an auth failure.

use tracing::{info, warn};

use auth_flow::{AuthFlowController, SessionStore};

use crate::documents::DocumentRecord;

/// Application shell: flow controller + per-session document context.
pub struct AppShell<S: SessionStore> {
    controller: AuthFlowController<S>,
    documents: Vec<DocumentRecord>,
}

impl<S: SessionStore> AppShell<S> {
    pub fn new(store: S) -> Self {
        Self {
            controller: AuthFlowController::new(store),
            documents: Vec::new(),
        }
    }

    /// The flow controller, for driving authentication steps.
    pub fn controller(&mut self) -> &mut AuthFlowController<S> {
        &mut self.controller
    }

    /// Read-only: the signed-in user's id.
    pub fn current_user_id(&self) -> Option<&str> {
        self.controller.current_user_id()
    }

    /// Read-only: the signed-in user's verification flag.
    pub fn is_user_verified(&self) -> bool {
        self.controller.is_user_verified()
    }

    /// Documents analyzed this session, oldest first.
    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    /// The host reports a finished analysis.
    ///
    /// A success supersedes whatever error was on screen.
    pub fn on_document_analyzed(&mut self, record: DocumentRecord) {
        info!(document_id = %record.id, name = %record.name, "document analyzed");
        self.controller.clear_app_error();
        self.documents.push(record);
    }

    /// The host reports a failed analysis into the shared error channel.
    pub fn on_analysis_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(%message, "document analysis failed");
        self.controller.set_app_error(message);
    }

    /// Like [`Self::on_analysis_error`], but the attempt itself is known:
    /// the failed record stays in the history alongside completed ones, the
    /// way the backend keeps failed analyses on the user's documents.
    pub fn on_analysis_failed(&mut self, record: DocumentRecord, message: impl Into<String>) {
        let message = message.into();
        warn!(document_id = %record.id, name = %record.name, %message, "document analysis failed");
        self.controller.set_app_error(message);
        self.documents.push(record);
    }

    /// Sidebar callback: end the session.
    ///
    /// Clears the document history along with the identity, so nothing from
    /// this session leaks into the next user's.
    pub fn on_logout(&mut self) {
        self.controller.logout();
        self.documents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_flow::testing::MemoryStorage;
    use auth_flow::{AuthEvent, FlowStep, Identity, KvSessionStore};

    fn signed_in_shell() -> AppShell<KvSessionStore<MemoryStorage>> {
        let mut shell = AppShell::new(KvSessionStore::new(MemoryStorage::new()));
        shell
            .controller()
            .handle(AuthEvent::EmailSubmitted("a@b.com".to_string()));
        shell
            .controller()
            .handle(AuthEvent::LoginSucceeded(Identity::from_email("a@b.com")));
        shell
    }

    #[test]
    fn test_analyzed_document_lands_in_history_and_clears_error() {
        let mut shell = signed_in_shell();
        shell.on_analysis_error("analysis failed: timeout");
        assert!(shell.controller().error().is_some());

        shell.on_document_analyzed(DocumentRecord::completed(
            "doc-1", "report.pdf", "A summary.", "a@b.com",
        ));

        assert_eq!(shell.documents().len(), 1);
        assert_eq!(shell.controller().error(), None);
    }

    #[test]
    fn test_analysis_error_surfaces_without_moving_the_flow() {
        let mut shell = signed_in_shell();
        shell.on_analysis_error("analysis failed: unsupported file type");

        assert_eq!(
            shell.controller().error(),
            Some("analysis failed: unsupported file type")
        );
        assert_eq!(shell.controller().current_step(), FlowStep::Authenticated);
    }

    #[test]
    fn test_failed_analysis_is_kept_in_history_with_the_error() {
        use crate::documents::DocumentStatus;

        let mut shell = signed_in_shell();
        shell.on_analysis_failed(
            DocumentRecord::failed("doc-9", "broken.bin", "a@b.com"),
            "analysis failed: unsupported file type for broken.bin",
        );

        assert_eq!(
            shell.controller().error(),
            Some("analysis failed: unsupported file type for broken.bin")
        );
        assert_eq!(shell.documents().len(), 1);
        assert_eq!(shell.documents()[0].status, DocumentStatus::Failed);
        assert_eq!(shell.documents()[0].summary, None);
    }

    #[test]
    fn test_logout_clears_history_with_the_session() {
        let mut shell = signed_in_shell();
        shell.on_document_analyzed(DocumentRecord::completed(
            "doc-1", "report.pdf", "A summary.", "a@b.com",
        ));

        shell.on_logout();

        assert_eq!(shell.controller().current_step(), FlowStep::EmailInput);
        assert_eq!(shell.current_user_id(), None);
        assert!(shell.documents().is_empty());
    }

    #[test]
    fn test_host_reads_reflect_the_identity() {
        let mut shell = AppShell::new(KvSessionStore::new(MemoryStorage::new()));
        assert_eq!(shell.current_user_id(), None);
        assert!(!shell.is_user_verified());

        shell
            .controller()
            .handle(AuthEvent::EmailSubmitted("a@b.com".to_string()));
        shell.controller().handle(AuthEvent::LoginSucceeded(
            Identity::from_email("a@b.com").verified(),
        ));

        assert_eq!(shell.current_user_id(), Some("a@b.com"));
        assert!(shell.is_user_verified());
    }
}
