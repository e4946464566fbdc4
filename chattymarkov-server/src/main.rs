use std::env;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use chattymarkov_core::chain::engine::ChattyMarkov;
use serde::Deserialize;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	namespace: Option<String>,
}

/// Struct representing query parameters for the `/v1/learn` endpoint
#[derive(Deserialize)]
struct LearnParams {
	sentence: Option<String>,
	namespace: Option<String>,
}

struct SharedData {
	markov: ChattyMarkov,
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a sentence from what the engine has learned so far,
/// optionally restricted to a namespace. Returns the sentence as the
/// response body; an engine that has learned nothing yet returns an
/// empty body.
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<GenerateParams>,
) -> impl Responder {
	let namespace = query.namespace.as_deref().unwrap_or("");

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};

	match shared_data.markov.generate_in(namespace) {
		Ok(sentence) => HttpResponse::Ok().body(sentence),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP PUT endpoint `/v1/learn`
///
/// Learns from the sentence given in the query parameters, optionally
/// under a namespace.
#[put("/v1/learn")]
async fn put_learn(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<LearnParams>,
) -> impl Responder {
	let sentence = match &query.sentence {
		Some(s) if !s.trim().is_empty() => s.as_str(),
		_ => return HttpResponse::BadRequest().body("Missing or empty sentence"),
	};
	let namespace = query.namespace.as_deref().unwrap_or("");

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};

	match shared_data.markov.learn_in(sentence, namespace) {
		Ok(()) => HttpResponse::Ok().body("Sentence learned successfully"),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/v1/config")]
async fn get_config(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};
	HttpResponse::Ok().body(shared_data.markov.prefix().to_owned())
}

/// Main entry point for the server.
///
/// Connects the engine to the backend named by the first command-line
/// argument (defaults to `memory://`), wraps it in a `Mutex` for
/// thread safety, and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - An invalid connection string fails startup; it is never deferred
///   to the learn/generate endpoints.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let connect_string = env::args().nth(1).unwrap_or_else(|| "memory://".to_owned());
	let markov = match ChattyMarkov::connect(&connect_string) {
		Ok(m) => m,
		Err(e) => return Err(std::io::Error::other(e.to_string())),
	};
	log::info!("connected to {}", connect_string);

	let shared_data = web::Data::new(Mutex::new(SharedData { markov }));

	log::info!("listening on 127.0.0.1:5000");
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_generated)
			.service(put_learn)
			.service(get_config)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
