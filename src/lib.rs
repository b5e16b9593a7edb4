//! clusterforge: compile Kubernetes cluster topologies into provisioning artifacts
//!
//! A request describing cluster settings, nodes and optional HAProxy load
//! balancers is validated, then turned into one inventory document per node
//! plus a consolidated JSON manifest, and finally handed to a package
//! assembler.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod package;
pub mod toolconfig;
