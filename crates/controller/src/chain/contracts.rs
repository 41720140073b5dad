//! Compile-time ABI definitions for the vault deployment via Alloy `sol!`.
//!
//! Method names and signatures match the deployed contracts on Mantle
//! Sepolia; encoding mistakes surface as compile errors rather than
//! runtime ABI mismatches.

use alloy::sol;

// ---------------------------------------------------------------------------
// Collateral token (ERC20 + test faucet)
// ---------------------------------------------------------------------------

sol! {
    /// The vault's collateral/debt token. Carries a public `mint` so testnet
    /// operators can fund themselves.
    #[sol(rpc)]
    interface IVaultToken {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function mint(address to, uint256 amount) external;
    }
}

// ---------------------------------------------------------------------------
// Collateral vault
// ---------------------------------------------------------------------------

sol! {
    /// Core lending vault: deposits, borrows, repayments, and per-user
    /// position accounting. `balanceOf` reports yield-bearing receipt shares.
    #[sol(rpc)]
    interface ICollateralVault {
        // -- per-user reads --
        function balanceOf(address account) external view returns (uint256);
        function getHealthFactor(address user) external view returns (uint256);
        function getTotalCollateralUSD(address user) external view returns (uint256);
        function getDebtUSDT(address user) external view returns (uint256);
        function isLiquidatable(address user) external view returns (bool);

        // -- vault-wide reads --
        function getUserCollateralValue(address user) external view returns (uint256);
        function getVaultDebt(address user) external view returns (uint256);
        function interestRatePerYear() external view returns (uint256);
        function allowedBorrowTokens() external view returns (address[] memory);
        function oracle() external view returns (address);

        // -- writes --
        function depositERC20(address asset, uint256 amount) external;
        function borrow(address asset, uint256 amount) external;
        function withdrawERC20(address asset, uint256 amount) external;
        function repay(uint256 amount) external;
        function repayWithBorrowToken(address token, uint256 amount) external;
    }
}

// ---------------------------------------------------------------------------
// Leverage integrator
// ---------------------------------------------------------------------------

sol! {
    /// Secondary contract bundling an approval and a deposit/borrow cycle
    /// into a single operator-initiated transaction.
    #[sol(rpc)]
    interface ILeverageIntegrator {
        function automatedLeverage(address asset, uint256 amount) external;
    }
}
