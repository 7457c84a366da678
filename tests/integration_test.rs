mod batch_operations;
mod cas_workflow;
mod common;
