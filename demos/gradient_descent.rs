use easy_autodiff::differentiation::Graph;
use easy_autodiff::parsing::{Expression, State};
use rand::{Rng, SeedableRng};

/**
 * Fits a line to noisy samples by gradient descent, building the squared error once and then
 * only updating the two parameters on every step.
 */
fn main() {
    env_logger::init();
    let mut random_generator = rand_chacha::ChaCha8Rng::seed_from_u64(11);

    // y = 1.5x + 3 with some noise
    let samples: Vec<(f64, f64)> = (0..20)
        .map(|i| {
            let x = (i as f64 * 0.1) - 1.0;
            let noise = random_generator.random_range(-0.1..0.1);
            (x, (1.5 * x) + 3.0 + noise)
        })
        .collect();

    let graph = Graph::with_capacity(samples.len() * 16);
    let m = graph.variable("m", 0.0);
    let c = graph.variable("c", 0.0);
    let mut error = graph.constant(0.0);
    for (x, y) in &samples {
        let residual = (m * *x) + c - *y;
        error = error + (residual * residual);
    }
    let error = error / samples.len() as f64;

    let learning_rate = 0.1;
    for step in 0..500 {
        let gradients = match error.differentiate() {
            Ok(gradients) => gradients,
            Err(failure) => {
                eprintln!("Could not differentiate the error: {}", failure);
                return;
            }
        };
        let (dm, dc) = (gradients[&m], gradients[&c]);
        let (current_m, current_c) = (m.evaluate().unwrap_or(0.0), c.evaluate().unwrap_or(0.0));
        if m.set_value(current_m - learning_rate * dm).is_err()
            || c.set_value(current_c - learning_rate * dc).is_err()
        {
            return;
        }
        if step % 100 == 0 {
            println!("Step {}: error {:?}", step, error.evaluate());
        }
    }
    println!(
        "Fitted y = {:?}x + {:?} over {} nodes",
        m.evaluate(),
        c.evaluate(),
        graph.len()
    );

    // expressions can also be built from text on the same graph
    let state = State::from([("a".to_string(), 10.0), ("b".to_string(), 20.0)]);
    match Expression::parse(&graph, "a * a + b + a * a", &state) {
        Ok(expression) => match expression.differentiate() {
            Ok(gradients) => println!(
                "d/da = {:?}, d/db = {:?}",
                gradients.by_label("a"),
                gradients.by_label("b")
            ),
            Err(failure) => eprintln!("{}", failure),
        },
        Err(failure) => eprintln!("{}", failure),
    }
}
