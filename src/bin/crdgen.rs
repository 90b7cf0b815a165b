//! Prints the `GlueJob` CRD as YAML, ready for `kubectl apply -f -`.

use glue_job_controller::crd::GlueJob;
use kube::CustomResourceExt;

fn main() {
    let crd = GlueJob::crd();

    match serde_yaml::to_string(&crd) {
        Ok(yaml) => {
            println!("# This file is auto-generated by crdgen");
            println!("# DO NOT EDIT THIS FILE MANUALLY");
            println!("# Change the GlueJob types in src/crd/ and regenerate");
            println!("---");
            print!("{yaml}");
        }
        Err(e) => {
            eprintln!("Failed to serialize CRD to YAML: {e}");
            std::process::exit(1);
        }
    }
}
