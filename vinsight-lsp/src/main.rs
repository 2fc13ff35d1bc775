//! vinsight LSP Server - unused prop, event and slot diagnostics for Vue.
//!
//! Provides IDE integration with:
//! - Live diagnostics on file open/save
//! - Faded-out (UNNECESSARY) warnings on declarations no parent uses

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use vinsight_core::{find_project_root, load_config, AnalysisResult, Insight, UnusedChannel};

const SOURCE: &str = "vinsight";

/// vinsight Language Server state.
struct InsightLsp {
    client: Client,
    /// Project root of the last analysed file.
    workspace_root: Arc<RwLock<Option<PathBuf>>>,
}

impl InsightLsp {
    fn new(client: Client) -> Self {
        Self {
            client,
            workspace_root: Arc::new(RwLock::new(None)),
        }
    }

    /// Run the analysis and publish diagnostics.
    async fn run_analysis(&self, uri: Url) {
        let file_path = match uri.to_file_path() {
            Ok(p) => p,
            Err(_) => {
                self.log_error("Invalid file URI").await;
                return;
            }
        };

        let workspace = self.workspace_root.read().await.clone();
        let project_root = match pick_root(&file_path, workspace) {
            Some(r) => r,
            None => {
                self.log_info("No package.json or workspace root, skipping analysis")
                    .await;
                return;
            }
        };

        match compute_diagnostics(project_root).await {
            Ok((result, file_diagnostics)) => {
                self.log_info(&format!(
                    "Analysis complete: {} components, {} unused channels",
                    result.interfaces.len(),
                    result.unused_channels.len()
                ))
                .await;
                for (file_uri, diagnostics) in file_diagnostics {
                    self.client
                        .publish_diagnostics(file_uri, diagnostics, None)
                        .await;
                }
            }
            Err(e) => {
                self.log_error(&format!("Analysis failed: {:#}", e)).await;
            }
        }
    }

    async fn log_info(&self, message: &str) {
        self.client.log_message(MessageType::INFO, message).await;
    }

    async fn log_error(&self, message: &str) {
        self.client.log_message(MessageType::ERROR, message).await;
    }
}

/// Analyse the project off the async runtime and turn the result into
/// per-file diagnostics.
async fn compute_diagnostics(
    project_root: PathBuf,
) -> Result<(AnalysisResult, HashMap<Url, Vec<Diagnostic>>)> {
    let result = tokio::task::spawn_blocking(move || analyze(&project_root))
        .await
        .context("Analysis task panicked")??;
    let diagnostics = unused_diagnostics(&result);
    Ok((result, diagnostics))
}

/// The nearest `package.json` directory above `file`, else the client's
/// workspace folder.
fn pick_root(file: &Path, workspace: Option<PathBuf>) -> Option<PathBuf> {
    find_project_root(file).or(workspace)
}

fn analyze(project_root: &Path) -> Result<AnalysisResult> {
    let config = load_config(project_root)?.unwrap_or_default();
    Insight::new(project_root)
        .with_cache(true)
        .with_config(&config)
        .analyze()
}

fn diagnostic_for(unused: &UnusedChannel, uri: &Url) -> Diagnostic {
    let line = unused.line.unwrap_or(0) as u32;
    Diagnostic {
        range: Range {
            start: Position { line, character: 0 },
            end: Position {
                line,
                character: 100,
            },
        },
        severity: Some(DiagnosticSeverity::WARNING),
        code: Some(NumberOrString::String(format!("unused-{}", unused.kind))),
        code_description: None,
        source: Some(SOURCE.to_string()),
        message: format!(
            "Unused {}: `{}` of `{}` is not used by any parent component",
            unused.kind, unused.name, unused.component
        ),
        related_information: Some(vec![DiagnosticRelatedInformation {
            location: Location {
                uri: uri.clone(),
                range: Range::default(),
            },
            message: "No template that imports this component references it".to_string(),
        }]),
        tags: Some(vec![DiagnosticTag::UNNECESSARY]),
        data: Some(json!({ "kind": unused.kind, "index": unused.index })),
    }
}

/// Diagnostics for every analysed file. Files without findings get an empty
/// list so stale warnings are cleared.
fn unused_diagnostics(result: &AnalysisResult) -> HashMap<Url, Vec<Diagnostic>> {
    let mut out: HashMap<Url, Vec<Diagnostic>> = HashMap::new();

    for interface in &result.interfaces {
        if let Ok(uri) = Url::from_file_path(&interface.full_path) {
            out.entry(uri).or_default();
        }
    }

    for unused in &result.unused_channels {
        if let Ok(uri) = Url::from_file_path(&unused.full_path) {
            let diagnostic = diagnostic_for(unused, &uri);
            out.entry(uri).or_default().push(diagnostic);
        }
    }

    out
}

fn is_vue(uri: &Url) -> bool {
    uri.path().ends_with(".vue")
}

#[tower_lsp::async_trait]
impl LanguageServer for InsightLsp {
    async fn initialize(&self, params: InitializeParams) -> LspResult<InitializeResult> {
        if let Some(root_uri) = params.root_uri {
            if let Ok(path) = root_uri.to_file_path() {
                let mut root = self.workspace_root.write().await;
                *root = Some(path);
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(false),
                        })),
                        ..Default::default()
                    },
                )),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: "vinsight-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "vinsight LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        if is_vue(&uri) {
            self.run_analysis(uri).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        if is_vue(&uri) {
            self.run_analysis(uri).await;
        }
    }

    async fn did_change(&self, _params: DidChangeTextDocumentParams) {
        // Analysis reads files from disk, so it runs on save only.
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] vinsight-lsp internal error: {}", info);
    }));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(InsightLsp::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
