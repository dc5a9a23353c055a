//! Dense statevector execution of parsed circuits.
//!
//! Qubit `k` maps to bit `k` of the amplitude index. Measurements are
//! terminal: the final distribution is sampled per shot instead of collapsing
//! the state, which keeps repeated shots cheap.

use indexmap::IndexMap;

use crate::parser::{GateKind, GateOp, Op, Program};
use crate::rng::SampleRng;
use crate::{OutcomeCount, SimulationError};

/// Largest circuit the statevector engine will execute. One amplitude per
/// basis state puts a 20-qubit circuit at sixteen megabytes.
pub const MAX_SIM_QUBITS: usize = 20;

pub(crate) fn run(
    program: &Program,
    shots: u32,
    rng: &mut SampleRng,
) -> Result<Vec<OutcomeCount>, SimulationError> {
    if program.qubits > MAX_SIM_QUBITS {
        return Err(SimulationError::Backend {
            message: format!(
                "circuit needs {} qubits, statevector capacity is {MAX_SIM_QUBITS}",
                program.qubits
            ),
        });
    }
    let plan = measurement_plan(program)?;
    let mut state = State::new(program.qubits);
    for op in &program.ops {
        if let Op::Gate(gate) = op {
            state.apply(gate);
        }
    }
    Ok(sample(&state, &plan, shots, rng))
}

/// Mapping from measured qubits to classical bits, plus the rendered key
/// width. When the circuit measures nothing, every qubit is measured into a
/// classical bit of the same index.
struct MeasurePlan {
    width: usize,
    map: Vec<(usize, usize)>,
}

fn measurement_plan(program: &Program) -> Result<MeasurePlan, SimulationError> {
    let mut map = Vec::new();
    let mut measured = false;
    for op in &program.ops {
        match op {
            Op::Gate(_) if measured => {
                return Err(SimulationError::Backend {
                    message: "mid-circuit measurement is unsupported; measurements must \
                              terminate the circuit"
                        .to_owned(),
                });
            }
            Op::Gate(_) => {}
            Op::Measure { qubit, clbit } => {
                measured = true;
                map.push((*qubit, *clbit));
            }
        }
    }
    if map.is_empty() {
        Ok(MeasurePlan {
            width: program.qubits,
            map: (0..program.qubits).map(|qubit| (qubit, qubit)).collect(),
        })
    } else {
        Ok(MeasurePlan {
            width: program.clbits,
            map,
        })
    }
}

fn sample(state: &State, plan: &MeasurePlan, shots: u32, rng: &mut SampleRng) -> Vec<OutcomeCount> {
    let mut cumulative = Vec::with_capacity(state.amplitudes.len());
    let mut total = 0.0f64;
    for amplitude in &state.amplitudes {
        total += amplitude.norm_sqr();
        cumulative.push(total);
    }
    let last = state.amplitudes.len() - 1;
    let mut histogram: IndexMap<String, u64> = IndexMap::new();
    for _ in 0..shots {
        let draw = rng.next_f64() * total;
        let basis = cumulative.partition_point(|&bound| bound <= draw).min(last);
        *histogram.entry(render_key(basis, plan)).or_insert(0) += 1;
    }
    histogram
        .into_iter()
        .map(|(key, count)| OutcomeCount { key, count })
        .collect()
}

/// Renders the classical bits of one basis state, bit zero rightmost.
fn render_key(basis: usize, plan: &MeasurePlan) -> String {
    let mut bits = vec![false; plan.width];
    for &(qubit, clbit) in &plan.map {
        if clbit < plan.width {
            bits[clbit] = basis & (1 << qubit) != 0;
        }
    }
    bits.iter()
        .rev()
        .map(|&bit| if bit { '1' } else { '0' })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Complex {
    re: f64,
    im: f64,
}

impl Complex {
    const ZERO: Self = Self::new(0.0, 0.0);
    const ONE: Self = Self::new(1.0, 0.0);

    const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    fn add(self, other: Self) -> Self {
        Self::new(self.re + other.re, self.im + other.im)
    }

    fn mul(self, other: Self) -> Self {
        Self::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }

    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }

    fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

type Matrix = [[Complex; 2]; 2];

const FRAC: f64 = std::f64::consts::FRAC_1_SQRT_2;

const PAULI_X: Matrix = [
    [Complex::ZERO, Complex::ONE],
    [Complex::ONE, Complex::ZERO],
];
const PAULI_Y: Matrix = [
    [Complex::ZERO, Complex::new(0.0, -1.0)],
    [Complex::new(0.0, 1.0), Complex::ZERO],
];
const PAULI_Z: Matrix = [
    [Complex::ONE, Complex::ZERO],
    [Complex::ZERO, Complex::new(-1.0, 0.0)],
];
const HADAMARD: Matrix = [
    [Complex::new(FRAC, 0.0), Complex::new(FRAC, 0.0)],
    [Complex::new(FRAC, 0.0), Complex::new(-FRAC, 0.0)],
];
const S_GATE: Matrix = [
    [Complex::ONE, Complex::ZERO],
    [Complex::ZERO, Complex::new(0.0, 1.0)],
];
const SDG_GATE: Matrix = [
    [Complex::ONE, Complex::ZERO],
    [Complex::ZERO, Complex::new(0.0, -1.0)],
];
const T_GATE: Matrix = [
    [Complex::ONE, Complex::ZERO],
    [Complex::ZERO, Complex::new(FRAC, FRAC)],
];
const TDG_GATE: Matrix = [
    [Complex::ONE, Complex::ZERO],
    [Complex::ZERO, Complex::new(FRAC, -FRAC)],
];

fn rotation_x(theta: f64) -> Matrix {
    let half = theta / 2.0;
    [
        [
            Complex::new(half.cos(), 0.0),
            Complex::new(0.0, -half.sin()),
        ],
        [
            Complex::new(0.0, -half.sin()),
            Complex::new(half.cos(), 0.0),
        ],
    ]
}

fn rotation_y(theta: f64) -> Matrix {
    let half = theta / 2.0;
    [
        [Complex::new(half.cos(), 0.0), Complex::new(-half.sin(), 0.0)],
        [Complex::new(half.sin(), 0.0), Complex::new(half.cos(), 0.0)],
    ]
}

fn rotation_z(theta: f64) -> Matrix {
    let half = theta / 2.0;
    [
        [Complex::new(half.cos(), -half.sin()), Complex::ZERO],
        [Complex::ZERO, Complex::new(half.cos(), half.sin())],
    ]
}

fn phase_shift(lambda: f64) -> Matrix {
    [
        [Complex::ONE, Complex::ZERO],
        [Complex::ZERO, Complex::new(lambda.cos(), lambda.sin())],
    ]
}

struct State {
    amplitudes: Vec<Complex>,
}

impl State {
    fn new(qubits: usize) -> Self {
        let mut amplitudes = vec![Complex::ZERO; 1 << qubits];
        amplitudes[0] = Complex::ONE;
        Self { amplitudes }
    }

    fn apply(&mut self, gate: &GateOp) {
        let operands = &gate.qubits;
        match gate.kind {
            GateKind::Identity => {}
            GateKind::PauliX => self.apply_single(&PAULI_X, operands[0]),
            GateKind::PauliY => self.apply_single(&PAULI_Y, operands[0]),
            GateKind::PauliZ => self.apply_single(&PAULI_Z, operands[0]),
            GateKind::Hadamard => self.apply_single(&HADAMARD, operands[0]),
            GateKind::S => self.apply_single(&S_GATE, operands[0]),
            GateKind::Sdg => self.apply_single(&SDG_GATE, operands[0]),
            GateKind::T => self.apply_single(&T_GATE, operands[0]),
            GateKind::Tdg => self.apply_single(&TDG_GATE, operands[0]),
            GateKind::Rx(theta) => self.apply_single(&rotation_x(theta), operands[0]),
            GateKind::Ry(theta) => self.apply_single(&rotation_y(theta), operands[0]),
            GateKind::Rz(theta) => self.apply_single(&rotation_z(theta), operands[0]),
            GateKind::Phase(lambda) => self.apply_single(&phase_shift(lambda), operands[0]),
            GateKind::Cx => self.apply_cx(operands[0], operands[1]),
            GateKind::Cz => self.apply_cz(operands[0], operands[1]),
            GateKind::Swap => self.apply_swap(operands[0], operands[1]),
            GateKind::Ccx => self.apply_ccx(operands[0], operands[1], operands[2]),
        }
    }

    fn apply_single(&mut self, matrix: &Matrix, target: usize) {
        let mask = 1usize << target;
        for index in 0..self.amplitudes.len() {
            if index & mask == 0 {
                let low = self.amplitudes[index];
                let high = self.amplitudes[index | mask];
                self.amplitudes[index] = matrix[0][0].mul(low).add(matrix[0][1].mul(high));
                self.amplitudes[index | mask] = matrix[1][0].mul(low).add(matrix[1][1].mul(high));
            }
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let control_mask = 1usize << control;
        let target_mask = 1usize << target;
        for index in 0..self.amplitudes.len() {
            if index & control_mask != 0 && index & target_mask == 0 {
                self.amplitudes.swap(index, index | target_mask);
            }
        }
    }

    fn apply_cz(&mut self, first: usize, second: usize) {
        let mask = (1usize << first) | (1usize << second);
        for index in 0..self.amplitudes.len() {
            if index & mask == mask {
                self.amplitudes[index] = self.amplitudes[index].neg();
            }
        }
    }

    fn apply_swap(&mut self, first: usize, second: usize) {
        let first_mask = 1usize << first;
        let second_mask = 1usize << second;
        for index in 0..self.amplitudes.len() {
            if index & first_mask != 0 && index & second_mask == 0 {
                self.amplitudes.swap(index, index ^ first_mask ^ second_mask);
            }
        }
    }

    fn apply_ccx(&mut self, first_control: usize, second_control: usize, target: usize) {
        let controls = (1usize << first_control) | (1usize << second_control);
        let target_mask = 1usize << target;
        for index in 0..self.amplitudes.len() {
            if index & controls == controls && index & target_mask == 0 {
                self.amplitudes.swap(index, index | target_mask);
            }
        }
    }
}
