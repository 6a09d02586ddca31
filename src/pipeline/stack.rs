use crate::alphabet::letter_at;
use crate::pipeline::rotor::Rotor;

/// Walzenlage: rotors ordered slow to fast
///
/// Index 0 is the leftmost (slowest) wheel, the last index is the rightmost
/// wheel that moves on every key press.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotorStack {
    rotors: Vec<Rotor>,
}

impl RotorStack {
    pub fn new(rotors: Vec<Rotor>) -> Self {
        Self { rotors }
    }

    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    pub fn push(&mut self, rotor: Rotor) {
        self.rotors.push(rotor);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rotor> {
        self.rotors.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Rotor> {
        self.rotors.iter_mut()
    }

    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    /// Current positions, slow to fast
    pub fn positions(&self) -> Vec<u8> {
        self.rotors.iter().map(|rotor| rotor.position).collect()
    }

    /// Current positions as the letters shown in the machine's windows
    pub fn window(&self) -> String {
        self.rotors.iter().map(|rotor| letter_at(rotor.position)).collect()
    }

    /// Step the rightmost three wheels once, before a letter is substituted
    ///
    /// Notch state is read before anything moves. A middle wheel sitting on
    /// its own notch moves together with the left wheel, which makes it step
    /// on two consecutive key presses (double step). With four wheels the
    /// leftmost one never moves.
    pub fn step(&mut self) {
        let count = self.rotors.len();
        if count < 3 {
            return;
        }

        let right = count - 1;
        let middle = right - 1;
        let left = middle - 1;

        let middle_at_notch = self.rotors[middle].at_notch();
        let right_at_notch = self.rotors[right].at_notch();

        self.rotors[right].advance();

        if right_at_notch || middle_at_notch {
            self.rotors[middle].advance();
        }

        if middle_at_notch {
            self.rotors[left].advance();
        }
    }

    /// Signal path towards the reflector: fastest wheel first
    pub fn forward(&self, letter: u8) -> u8 {
        self.rotors
            .iter()
            .rev()
            .fold(letter, |signal, rotor| rotor.encrypt_forward(signal))
    }

    /// Signal path back from the reflector: slowest wheel first
    pub fn reverse(&self, letter: u8) -> u8 {
        self.rotors
            .iter()
            .fold(letter, |signal, rotor| rotor.encrypt_reverse(signal))
    }
}

impl FromIterator<Rotor> for RotorStack {
    fn from_iter<T: IntoIterator<Item = Rotor>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RotorStack {
    type Item = &'a Rotor;
    type IntoIter = std::slice::Iter<'a, Rotor>;

    fn into_iter(self) -> Self::IntoIter {
        self.rotors.iter()
    }
}
