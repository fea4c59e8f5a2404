mod config;

use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, middleware, put, web, App, HttpResponse, HttpServer, Responder};
use env_logger::Env;
use log::{error, info, warn};

use serde::Deserialize;
use markov_gen_core::io::{document_path, list_documents};
use markov_gen_core::{ChainBuilder, ChainModel, Granularity, MarkovError, SeedPolicy, Settings};

use crate::config::ServerConfig;

/// Extension of the documents served from the data directory.
const DOCUMENT_EXTENSION: &str = "txt";

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	count: Option<usize>,
	seed: Option<String> // -> "clock" or an integer
}

/// Query parameters for the `/v1/load_documents` endpoint
#[derive(Deserialize)]
struct LoadQuery {
	names: Option<String>,
	order: Option<usize>,
	granularity: Option<Granularity>
}

/// A frozen model together with how it was built.
struct Session {
	model: ChainModel,
	granularity: Granularity,
	documents: Vec<String>
}

struct SharedData {
	data_dir: PathBuf,
	session: Option<Session>
}

impl GenerateParams {
	/// Validates the step count and seed against the default settings.
	fn settings(&self) -> Result<Settings, MarkovError> {
		let mut settings = Settings::default();
		if let Some(count) = self.count {
			settings.set_count(count)?;
		}
		if let Some(seed) = &self.seed {
			settings.seed = seed.parse::<SeedPolicy>()?;
		}
		Ok(settings)
	}
}

impl LoadQuery {
	/// Validates the order and granularity against the default settings.
	fn settings(&self) -> Result<Settings, MarkovError> {
		let mut settings = Settings::default();
		if let Some(order) = self.order {
			settings.set_order(order)?;
		}
		if let Some(granularity) = self.granularity {
			settings.granularity = granularity;
		}
		Ok(settings)
	}

	/// Comma-separated document names, trimmed, empties dropped.
	fn names(&self) -> Vec<&str> {
		match &self.names {
			Some(s) => s.split(',').map(str::trim).filter(|s| !s.is_empty()).collect(),
			None => Vec::new(),
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Runs a random walk over the loaded model and returns the generated text.
/// - 409 if no document set is loaded
/// - 400 for an invalid count or seed
/// - 500 if the walk hits an internal invariant failure
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let settings = match query.settings() {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string())
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let session = match &shared_data.session {
		Some(session) => session,
		None => return HttpResponse::Conflict().body("No documents loaded"),
	};

	let mut random = settings.seed.random();
	match session.model.generate(settings.count(), session.granularity, &mut random) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => {
			error!("generation failed (seed {}): {e}", random.seed_value());
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/documents`
///
/// Lists the documents available in the data directory, without extension.
#[get("/v1/documents")]
async fn get_documents(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let data_dir = match data.lock() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match list_documents(&data_dir, DOCUMENT_EXTENSION) {
		Ok(files) => {
			let suffix = format!(".{DOCUMENT_EXTENSION}");
			let names: Vec<&str> = files.iter().map(|f| f.trim_end_matches(suffix.as_str())).collect();
			HttpResponse::Ok().body(names.join("\n"))
		}
		Err(e) => {
			warn!("cannot list {}: {e}", data_dir.display());
			HttpResponse::InternalServerError().body("Failed to list documents")
		}
	}
}

/// HTTP GET endpoint `/v1/loaded_documents`
///
/// Names of the documents the current model was built from.
#[get("/v1/loaded_documents")]
async fn get_loaded_documents(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match &shared_data.session {
		Some(session) => HttpResponse::Ok().body(session.documents.join("\n")),
		None => HttpResponse::Ok().body(""),
	}
}

/// HTTP GET endpoint `/v1/dump`
///
/// Human-readable listing of every window of the loaded model.
#[get("/v1/dump")]
async fn get_dump(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match &shared_data.session {
		Some(session) => HttpResponse::Ok().body(session.model.dump()),
		None => HttpResponse::Conflict().body("No documents loaded"),
	}
}

/// HTTP PUT endpoint `/v1/load_documents`
///
/// Builds a fresh model from the named documents and replaces the current one.
/// The current model is kept if any document fails to load.
/// - 400 for a name that is not a plain file stem (e.g. `../x`)
/// - 404 for a document missing from the data directory
#[put("/v1/load_documents")]
async fn put_documents(data: web::Data<Mutex<SharedData>>, query: web::Query<LoadQuery>) -> impl Responder {
	let names = query.names();
	if names.is_empty() {
		return HttpResponse::BadRequest().body("Missing or empty document name");
	}

	let settings = match query.settings() {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string())
	};

	let data_dir = match data.lock() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let mut builder = match ChainBuilder::new(settings.order()) {
		Ok(b) => b,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string())
	};
	for name in &names {
		let path = match document_path(&data_dir, name, DOCUMENT_EXTENSION) {
			Ok(p) => p,
			Err(e) => {
				warn!("rejected document name: {e}");
				return HttpResponse::BadRequest().body(format!("Invalid document name: {name}"));
			}
		};
		if let Err(e) = builder.ingest_file(&path, settings.granularity) {
			warn!("cannot load {}: {e}", path.display());
			return match e {
				MarkovError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
					HttpResponse::NotFound().body(format!("Document not found: {name}"))
				}
				e => HttpResponse::InternalServerError().body(format!("Failed to load document: {e}")),
			};
		}
	}

	let model = match builder.build() {
		Ok(m) => m,
		Err(e) => return HttpResponse::InternalServerError().body(e.to_string())
	};
	info!(
		"loaded {} document(s), order {}, {}: {} windows",
		names.len(),
		model.order(),
		settings.granularity,
		model.len()
	);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.session = Some(Session {
		model,
		granularity: settings.granularity,
		documents: names.iter().map(|s| (*s).to_owned()).collect(),
	});

	HttpResponse::Ok().body("Documents loaded successfully")
}

/// Registers every endpoint.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(get_documents)
		.service(get_loaded_documents)
		.service(get_dump)
		.service(put_documents);
}

/// Main entry point for the server.
///
/// Reads `ServerConfig` from the environment, starts with no model loaded,
/// and serves the document and generation endpoints.
#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let config = ServerConfig::from_env()?;
	info!(
		"serving {} on {}:{} with {} workers",
		config.data_dir.display(),
		config.host,
		config.port,
		config.workers
	);

	let shared_data = SharedData {
		data_dir: config.data_dir.clone(),
		session: None,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		let cors = Cors::default()
			.allow_any_origin()
			.allowed_methods(vec!["GET", "PUT"]);
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(cors)
			.app_data(shared_model.clone())
			.configure(configure)
	})
		.workers(config.workers)
		.bind((config.host.as_str(), config.port))?
		.run()
		.await?;

	Ok(())
}
