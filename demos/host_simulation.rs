//! Host simulation of the control loop.
//!
//! Runs the engine against simulated hardware: delays advance a virtual
//! clock instead of sleeping, the button is pressed on a script, and the
//! display prints to the console. Shows constant-rate stepping with two
//! speed changes, then a reversing eased plan.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use stepper_timing::{
    Button, ControlLoop, ControlState, Direction, DisplayAdapter, EngineConfig, FnHousekeeping,
    MonotonicClock, MotionRequest, StepPulseDriverBuilder,
};

/// Virtual time in microseconds, shared by the delay, clock and button.
type SimTime = Rc<Cell<u64>>;

/// Delay provider that advances virtual time.
struct SimDelay(SimTime);

impl embedded_hal::delay::DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + (ns as u64 + 999) / 1000);
    }

    fn delay_us(&mut self, us: u32) {
        self.0.set(self.0.get() + us as u64);
    }
}

/// Clock reading virtual time.
struct SimClock(SimTime);

impl MonotonicClock for SimClock {
    fn now_ms(&mut self) -> u32 {
        (self.0.get() / 1000) as u32
    }
}

/// Output pin that counts rising edges.
struct CountingPin {
    edges: Rc<Cell<u64>>,
}

impl embedded_hal::digital::ErrorType for CountingPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for CountingPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.edges.set(self.edges.get() + 1);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Active-low button held down during scripted windows of virtual time.
struct ScriptedButton {
    time: SimTime,
    presses_ms: Vec<(u64, u64)>,
}

impl ScriptedButton {
    fn pressed(&self) -> bool {
        let now_ms = self.time.get() / 1000;
        self.presses_ms
            .iter()
            .any(|&(start, end)| (start..end).contains(&now_ms))
    }
}

impl embedded_hal::digital::ErrorType for ScriptedButton {
    type Error = Infallible;
}

impl embedded_hal::digital::InputPin for ScriptedButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed())
    }
}

/// Display that prints each frame as one console line.
struct ConsoleDisplay {
    time: SimTime,
    frame: Vec<String>,
}

impl DisplayAdapter for ConsoleDisplay {
    type Error = Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.frame.clear();
        Ok(())
    }

    fn draw_text(&mut self, _x: i32, _y: i32, _size: u8, text: &str) -> Result<(), Self::Error> {
        self.frame.push(text.to_string());
        Ok(())
    }

    fn draw_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        let t = self.time.get() as f64 / 1_000_000.0;
        println!("[{:8.3} s] | {} |", t, self.frame.join(" | "));
        Ok(())
    }
}

fn main() {
    println!("=== Host Simulation ===\n");

    let config = EngineConfig::default();
    let time: SimTime = Rc::new(Cell::new(0));
    let step_edges = Rc::new(Cell::new(0u64));
    let services = Rc::new(Cell::new(0u64));

    let service_count = services.clone();
    let driver = StepPulseDriverBuilder::new()
        .step_pin(CountingPin {
            edges: step_edges.clone(),
        })
        .dir_pin(CountingPin {
            edges: Rc::new(Cell::new(0)),
        })
        .delay(SimDelay(time.clone()))
        .housekeeping(FnHousekeeping(move || service_count.set(service_count.get() + 1)))
        .from_config(&config)
        .build()
        .expect("driver configuration is valid");

    let button = Button::active_low(
        ScriptedButton {
            time: time.clone(),
            presses_ms: vec![(1_500, 1_600), (2_500, 2_600)],
        },
        config.debounce_ms as u32,
    );
    let display = ConsoleDisplay {
        time: time.clone(),
        frame: Vec::new(),
    };

    let mut control = ControlLoop::new(config, driver, button, SimClock(time.clone()), display);
    control.start().expect("startup");

    println!("-- constant rate, presses at 1.5 s and 2.5 s --");
    while time.get() < 3_500_000 {
        control.tick().expect("tick");
    }
    println!(
        "steps: {}, position: {} steps, rate now {} rps",
        step_edges.get(),
        control.driver().position_steps().value(),
        control.selected_rate().value()
    );

    println!("\n-- eased plan, two runs --");
    control.request(MotionRequest::FixedPlan {
        total_steps: 1000,
        direction: Direction::Clockwise,
    });
    while control.runs_completed() < 2 {
        control.tick().expect("tick");
    }
    while control.state() != ControlState::RunningPlan {
        control.tick().expect("tick");
    }

    if let Some(profile) = control.profile() {
        println!(
            "profile: {} steps, {} rev, {:.3} s per run",
            profile.len(),
            profile.rotations(),
            profile.total_duration_us() as f64 / 1_000_000.0
        );
    }
    println!(
        "total steps: {}, housekeeping calls: {}, virtual time {:.3} s",
        step_edges.get(),
        services.get(),
        time.get() as f64 / 1_000_000.0
    );
}
