mod checkout;
mod helpers;
mod mocks;
mod seller;
mod webhook;
