use wasm_bindgen::prelude::*;
use orrery_engine::*;

mod bodies;
mod builder;
mod catalog;
mod context;
mod game;
mod minimap;
mod navigator;
mod orbit;
mod picking;
mod satellites;
mod settings;
use game::Planetarium;

orrery_web::export_game!(Planetarium, "planetarium");
