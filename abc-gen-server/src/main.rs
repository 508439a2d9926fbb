use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};

use abc_gen_core::abc::{self, ScoreLayout, TuneHeader};
use abc_gen_core::io::{list_files, read_file};
use abc_gen_core::model::chain_model::ChainModel;
use abc_gen_core::model::walk_params::StartSeed;
use serde::Deserialize;

/// Struct representing query parameters for the `/v1/compose` endpoint
#[derive(Deserialize)]
struct ComposeParams {
	seed: Option<String>, // -> "common", "custom:<token>" or absent
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
}

struct SharedData {
	model: ChainModel,
	corpus_names: Vec<String>,
}

impl ComposeParams {
	/// Determines the starting-seed strategy for composition.
	fn start_seed(&self) -> Result<StartSeed, String> {
		match &self.seed {
			None => Ok(StartSeed::MostFrequent),
			Some(s) if s.to_lowercase() == "common" => Ok(StartSeed::MostFrequent),
			Some(s) if s.to_lowercase().starts_with("custom:") => {
				let value = &s["custom:".len()..];
				if value.is_empty() {
					Err("Custom seed cannot be empty".into())
				} else {
					Ok(StartSeed::Custom(value.to_owned()))
				}
			}
			Some(_) => Err("Seed must start with 'custom:' or be 'common'".into()),
		}
	}
}

/// HTTP GET endpoint `/v1/compose`
///
/// Composes a tune from the loaded corpora. Header fields (`title`,
/// `composer`, ...) and score shape (`measures`, `words_per_measure`,
/// `measures_per_line`) come straight from the query string, with the
/// standard 4/4, C major, 50-measure defaults. Returns the composed
/// abc document as the response body.
#[get("/v1/compose")]
async fn get_composed(
	data: web::Data<Mutex<SharedData>>,
	header: web::Query<TuneHeader>,
	layout: web::Query<ScoreLayout>,
	query: web::Query<ComposeParams>,
) -> impl Responder {
	let start_seed = match query.start_seed() {
		Ok(seed) => seed,
		Err(error) => return HttpResponse::BadRequest().body(error),
	};

	let shared_data = match data.lock() {
		Ok(guard) => guard,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	if shared_data.model.is_empty() {
		return HttpResponse::InternalServerError().body("No corpus loaded");
	}

	let mut rng = rand::rng();
	let tune = abc::compose_tune(&shared_data.model, &header, &layout, &start_seed, &mut rng);
	HttpResponse::Ok().body(tune)
}

#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	match list_files("./data", "abc") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".abc", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(guard) => guard,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.corpus_names.join("\n"))
}

#[put("/v1/load_corpora")]
async fn put_corpora(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<CorpusQuery>,
) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<&str> = query_names
		.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.collect();

	let mut model = ChainModel::new();
	let mut loaded = Vec::new();
	for name in corpus_names {
		let corpus_path = format!("./data/{name}.abc");
		let lines = match read_file(&corpus_path) {
			Ok(lines) => lines,
			Err(error) => {
				return HttpResponse::InternalServerError()
					.body(format!("Failed to read corpus: {error}"));
			}
		};

		let mut partial_model = ChainModel::new();
		abc::train_from_lines(&mut partial_model, &lines);
		match model.merge(&partial_model) {
			Ok(_) => loaded.push(name.to_owned()),
			Err(error) => {
				return HttpResponse::InternalServerError()
					.body(format!("Failed to merge corpus: {error}"));
			}
		}
	}

	let mut shared_data = match data.lock() {
		Ok(guard) => guard,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.model = model;
	shared_data.corpus_names = loaded;
	log::info!(
		"loaded {} corpora ({} keys)",
		shared_data.corpus_names.len(),
		shared_data.model.len()
	);

	HttpResponse::Ok().body("Corpora loaded successfully")
}

/// Main entry point for the server.
///
/// Starts with an empty model; corpora are loaded through the REST API
/// from `./data/<name>.abc` files. The model is wrapped in a `Mutex`
/// because actix handlers run concurrently.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Currently, the data directory is hardcoded and should be made
///   configurable.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let shared_data = SharedData {
		model: ChainModel::new(),
		corpus_names: Vec::new(),
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_composed)
			.service(get_corpora)
			.service(put_corpora)
			.service(get_loaded_corpora)
	})
	.bind(("127.0.0.1", 5000))?
	.run()
	.await
}
