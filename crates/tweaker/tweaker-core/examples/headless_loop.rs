use std::thread;
use std::time::Duration;

use tweaker_core::{Interpolator, StepListener, TimeSnapshot, Tweaker, TweakerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cfg = TweakerConfig::default()
        .with_file_name("headless_demo.json")
        .with_duration_seconds(2.0)
        .with_steps_per_second(4.0);
    let mut tweaker = Tweaker::open(cfg)?;

    if tweaker.varyings().is_empty() {
        let zoom = tweaker.variable("zoom", 1.0);
        zoom.set(0, 1.0);
        zoom.set(4, 2.5);
        zoom.set(8, 1.0);

        let fade = tweaker.variable("fade", 0.0);
        fade.set_interpolator(Interpolator::Linear);
        fade.set(2, 0.0);
        fade.set(6, 1.0);
    }

    tweaker.add_listener(StepListener::new().on_restarted(|t: &TimeSnapshot| {
        println!("restarted at step {}", t.step_count)
    }));

    tweaker.start();
    for _ in 0..40 {
        thread::sleep(Duration::from_millis(50));
        tweaker.update();
        println!(
            "t={:>5.2}s step={:>2} zoom={:.3} fade={:.3}",
            tweaker.time().seconds_since_start(),
            tweaker.current_step(),
            tweaker.value("zoom", 1.0),
            tweaker.value("fade", 0.0),
        );
    }

    println!("{}", tweaker.save_to_string()?);
    Ok(())
}
