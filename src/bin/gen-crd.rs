use kube::CustomResourceExt;
use serde_json::{json, Value};
use varanto::crd::v1::NodePool as NodePoolV1;
use varanto::crd::v1beta1::NodePool as NodePoolV1beta1;

fn main() -> anyhow::Result<()> {
    // Generate the NodePool CRD with both versions and the conversion webhook.
    // Use: cargo run --bin gen-crd | python3 -c "import sys,json,yaml; print(yaml.dump(json.load(sys.stdin), default_flow_style=False))"
    // to convert to YAML

    // Base CRD from v1 (the storage version)
    let mut crd: Value = serde_json::to_value(NodePoolV1::crd())?;

    // Extract the v1beta1 version entry from its own generated CRD
    let v1beta1_crd: Value = serde_json::to_value(NodePoolV1beta1::crd())?;
    let v1beta1_version = v1beta1_crd["spec"]["versions"][0].clone();

    if let Some(versions) = crd["spec"]["versions"].as_array_mut() {
        if let Some(v1) = versions.get_mut(0) {
            v1["storage"] = json!(true);
            v1["served"] = json!(true);
        }
        // v1beta1 stays served for old clients but is never the storage version
        let mut v1beta1 = v1beta1_version.clone();
        v1beta1["storage"] = json!(false);
        v1beta1["served"] = json!(true);
        versions.push(v1beta1);
    }

    // Conversion webhook configuration
    crd["spec"]["conversion"] = json!({
        "strategy": "Webhook",
        "webhook": {
            "clientConfig": {
                "service": {
                    "name": "varanto-webhook",
                    "namespace": "varanto-system",
                    "path": "/convert",
                    "port": 8443
                }
            },
            "conversionReviewVersions": ["v1"]
        }
    });

    let json_output = serde_json::to_string_pretty(&crd)?;
    println!("{}", json_output);
    Ok(())
}
