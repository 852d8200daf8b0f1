//! One-shot diagram loader.
//!
//! Reads and parses the diagram off the UI task and reports back through the
//! action channel. The task sends exactly one message, success or failure,
//! and is never retried.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use floorview_core::DiagramDocument;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::action::Action;

pub fn spawn_diagram_loader(
    path: PathBuf,
    code_attribute: String,
    action_tx: mpsc::UnboundedSender<Action>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let action = match load(&path, &code_attribute).await {
            Ok(document) => {
                info!(
                    path = %path.display(),
                    regions = document.regions().len(),
                    "diagram loaded"
                );
                Action::DiagramLoaded(Arc::new(document))
            }
            Err(message) => {
                warn!(path = %path.display(), %message, "diagram failed to load");
                Action::DiagramFailed(message)
            }
        };
        // The app may already be gone; nothing to do then.
        let _ = action_tx.send(action);
    })
}

async fn load(path: &Path, code_attribute: &str) -> Result<DiagramDocument, String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    // Parsing is CPU-bound; keep it off the runtime's I/O threads.
    let code_attribute = code_attribute.to_owned();
    tokio::task::spawn_blocking(move || DiagramDocument::parse_with(&text, &code_attribute))
        .await
        .map_err(|e| format!("diagram parser task failed: {e}"))?
        .map_err(|e| e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn reports_loaded_document_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"<svg viewBox="0 0 10 10"><rect data-code="1" x="0" y="0" width="5" height="5"/></svg>"#
        )
        .unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_diagram_loader(file.path().to_path_buf(), "data-code".into(), tx)
            .await
            .unwrap();

        match rx.recv().await {
            Some(Action::DiagramLoaded(doc)) => assert_eq!(doc.regions().len(), 1),
            other => panic!("unexpected {other:?}"),
        }
        // Sender dropped with the task: no second message.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn reports_missing_file_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_diagram_loader(dir.path().join("absent.svg"), "data-code".into(), tx)
            .await
            .unwrap();

        match rx.recv().await {
            Some(Action::DiagramFailed(message)) => assert!(message.contains("absent.svg")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
