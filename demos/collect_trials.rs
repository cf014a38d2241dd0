use wave_http::models::{DataRowCreate, ExperimentCreate, ExperimentTypeCreate};
use wave_http::{ClientOptions, WaveClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = WaveClient::from_env()?.with_options(ClientOptions::collection());

    let experiment_type = client
        .experiment_types()
        .create(
            ExperimentTypeCreate::new("stroop", "stroop_trials")
                .with_description("Color-word interference task")
                .column("reaction_ms", "INTEGER")
                .column("stimulus", "STRING")
                .column("correct", "BOOLEAN"),
        )
        .await?;

    let experiment = client
        .experiments()
        .create(
            ExperimentCreate::new(experiment_type.id, "Stroop pilot, session 1")
                .tag("pilot")
                .tag("stroop"),
        )
        .await?;
    println!("experiment {}", experiment.uuid);

    let data = client.data();
    let trials = [
        ("red", 412, true),
        ("blue", 388, true),
        ("green", 501, false),
    ];
    for (stimulus, reaction_ms, correct) in trials {
        data.create(
            &experiment.uuid,
            DataRowCreate::new("p-001")
                .field("stimulus", stimulus)
                .field("reaction_ms", reaction_ms)
                .field("correct", correct),
        )
        .await?;
    }

    let table = data.all_table(&experiment.uuid, 500).await?;
    println!("{}", table.columns().join("  "));
    for row in table.rows() {
        println!(
            "{:>4?}  {:<8}  {:?}",
            row.get_i64("reaction_ms"),
            row.get_str("stimulus").unwrap_or("-"),
            row.get_bool("correct")
        );
    }

    Ok(())
}
