//! End-to-end scenarios over the whole pipeline.

mod scenarios;
