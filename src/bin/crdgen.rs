use kube::CustomResourceExt;
use nango_operator::crd::NangoIntegration;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&NangoIntegration::crd())?);
    Ok(())
}
