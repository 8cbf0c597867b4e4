/// Счётчик поколений запросов одного экрана.
///
/// Каждый запрос получает билет текущего поколения; результат применяется,
/// только если с момента выдачи билета не был начат более новый запрос.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generation {
    current: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Билет запроса.
pub struct RequestTicket(u64);

impl Generation {
    /// Начинает новое поколение, делая все ранее выданные билеты устаревшими.
    pub fn begin(&mut self) -> RequestTicket {
        self.current += 1;
        RequestTicket(self.current)
    }

    /// Билет относится к последнему начатому запросу.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.current
    }

    /// Делает устаревшими все выданные билеты без нового запроса.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut generation = Generation::default();
        let first = generation.begin();
        assert!(generation.is_current(first));

        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn invalidate_drops_outstanding_ticket() {
        let mut generation = Generation::default();
        let ticket = generation.begin();
        generation.invalidate();
        assert!(!generation.is_current(ticket));
    }
}
