pub mod ingest_commands;
