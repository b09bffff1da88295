//! Servidor web Axum com WebSocket para acompanhar a rotulagem em tempo real

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use etner_core::{
    conll::join_blocks,
    corpus::demo_texts,
    gazetteer::GazetteerSet,
    pipeline::{LabeledMessage, NerPipeline, PipelineEvent},
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Estado compartilhado da aplicação
struct AppState {
    pipeline: NerPipeline,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Deserialize)]
struct ConllRequest {
    texts: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ETNER_GAZETTEERS aponta para um JSON com listas próprias
    let gazetteers = match std::env::var_os("ETNER_GAZETTEERS") {
        Some(path) => GazetteerSet::from_json_file(&path)
            .with_context(|| format!("falha ao carregar gazetteers de {path:?}"))?,
        None => GazetteerSet::default(),
    };
    let state = Arc::new(AppState {
        pipeline: NerPipeline::with_gazetteers(gazetteers),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .route("/conll", post(conll_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state);

    let addr: SocketAddr = std::env::var("ETNER_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .context("ETNER_ADDR inválido")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("falha ao escutar em {addr}"))?;
    info!("servidor de rotulagem iniciado em http://{addr}");
    axum::serve(listener, app).await.context("servidor encerrado com erro")?;
    Ok(())
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Rotulagem via HTTP POST (sem streaming). Texto vazio devolve uma mensagem vazia.
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<LabeledMessage> {
    Json(state.pipeline.analyze(&req.text))
}

/// Documento CoNLL para um lote de mensagens, na ordem recebida
async fn conll_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConllRequest>,
) -> impl IntoResponse {
    let doc = join_blocks(
        req.texts
            .iter()
            .map(|text| state.pipeline.analyze(text).to_conll_block()),
    );
    ([("content-type", "text/plain; charset=utf-8")], doc)
}

/// Retorna textos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_texts()
        .iter()
        .map(|(domain, text)| serde_json::json!({ "domain": domain, "text": text }))
        .collect();
    Json(texts)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Recebe texto (puro ou `{"text": ...}`), executa o pipeline e envia os eventos
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(raw) => {
                let text = match serde_json::from_str::<AnalyzeRequest>(&raw) {
                    Ok(req) => req.text,
                    Err(_) => raw.to_string(),
                };
                if text.trim().is_empty() {
                    continue;
                }

                info!(chars = text.chars().count(), "analisando via WebSocket");

                // o pipeline é síncrono; roda fora do runtime
                let (tx, rx) = std::sync::mpsc::channel::<PipelineEvent>();
                let worker = Arc::clone(&state);
                let handle = tokio::task::spawn_blocking(move || {
                    worker.pipeline.analyze_streaming(&text, tx);
                });
                if let Err(e) = handle.await {
                    warn!(error = %e, "pipeline abortado");
                    continue;
                }

                let events: Vec<PipelineEvent> = rx.try_iter().collect();
                for event in &events {
                    let json = match serde_json::to_string(event) {
                        Ok(json) => json,
                        Err(e) => {
                            warn!(error = %e, "evento não serializável");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(json)).await.is_err() {
                        return; // cliente desconectou
                    }
                    // pausa curta para a animação passo a passo
                    tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}
