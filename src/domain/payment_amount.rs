use std::fmt::Debug;

// A charge amount in the smallest currency unit, always greater than zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentAmount(i32);

impl PaymentAmount{
    pub fn parse(amount: &str) -> Result<PaymentAmount, String>{
        match amount.trim().parse::<i32>() {
            Ok(value) if value > 0 => Ok(Self(value)),
            Ok(value) => Err(format!("{} is not a positive amount", value)),
            Err(_) => Err(format!("{} is not a valid amount", amount))
        }
    }

    pub fn inner(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for PaymentAmount {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(format!("{} is not a positive amount", value))
        }
    }
}

impl std::fmt::Display for PaymentAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
