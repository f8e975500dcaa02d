//! Core library for the `mailreaper` crawler: the Crawler/Spider/Scraper
//! subsystems plus the ambient CLI, config, and output glue around them.

pub mod cli;
pub mod config;
pub mod crawler;
pub mod emails;
pub mod error;
pub mod output;
pub mod scrape;
pub mod seeds;
pub mod spider;
